use serde::{Deserialize, Deserializer};

pub const FIRST_PAGE: usize = 1;

pub fn first_page() -> usize {
    FIRST_PAGE
}

// `?page=` is parsed leniently: anything that is not a positive integer
// falls back to the first page instead of rejecting the request
pub fn deserialize_page<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|page| *page >= FIRST_PAGE)
        .unwrap_or(FIRST_PAGE))
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageQuery {
    #[serde(default = "first_page", deserialize_with = "deserialize_page")]
    pub page: usize,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self { page: FIRST_PAGE }
    }
}
