//! Model selection.

/// Library-wide fallback model, used when a client config does not override
/// the default.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo-instruct";

/// Selects which backend model variant serves a request.
///
/// `Model::Default` is a marker, not a concrete model: the client resolves it
/// to its configured default at request-construction time, so it never
/// appears in a serialized request body.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Model {
    /// Use the client's configured default model.
    #[default]
    Default,
    /// A concrete model identifier, sent verbatim.
    Id(String),
}

impl Model {
    /// Shorthand for `Model::Id`.
    pub fn id(id: impl Into<String>) -> Self {
        Model::Id(id.into())
    }

    pub(crate) fn resolve<'a>(&'a self, default: &'a str) -> &'a str {
        match self {
            Model::Default => default,
            Model::Id(id) => id,
        }
    }
}

impl From<&str> for Model {
    fn from(id: &str) -> Self {
        Model::Id(id.to_string())
    }
}

impl From<String> for Model {
    fn from(id: String) -> Self {
        Model::Id(id)
    }
}
