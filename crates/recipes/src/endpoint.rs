use url::Url;

const BASE_URL: &str = "https://d3jbb8n5wk0qxi.cloudfront.net";

/// Hosted recipe lists: the real one plus an empty and a malformed variant for
/// exercising error states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecipeListEndpoint {
    #[default]
    Full,
    Empty,
    Malformed,
}

impl RecipeListEndpoint {
    fn file_name(self) -> &'static str {
        match self {
            RecipeListEndpoint::Full => "recipes.json",
            RecipeListEndpoint::Empty => "recipes-empty.json",
            RecipeListEndpoint::Malformed => "recipes-malformed.json",
        }
    }

    pub fn url(self) -> Result<Url, url::ParseError> {
        Url::parse(&format!("{BASE_URL}/{}", self.file_name()))
    }
}
