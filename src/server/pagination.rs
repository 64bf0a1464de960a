pub const QUESTIONS_PER_PAGE: usize = 10;

/// Returns the 1-based `page` of `items`: the half-open range
/// `[(page - 1) * QUESTIONS_PER_PAGE, page * QUESTIONS_PER_PAGE)`, clipped to
/// the input length. Page 0 is treated as page 1.
pub fn paginate<T>(items: Vec<T>, page: usize) -> Vec<T> {
    let start = page.saturating_sub(1).saturating_mul(QUESTIONS_PER_PAGE);
    items
        .into_iter()
        .skip(start)
        .take(QUESTIONS_PER_PAGE)
        .collect()
}
