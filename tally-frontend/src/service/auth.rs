use super::AuthProvider;

/// Bearer token handed to the persistence service. Never printed.
#[derive(Clone, Eq, PartialEq)]
pub struct Token(String);

impl Token {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Token(***)")
    }
}

#[derive(Debug, Default)]
pub struct SessionToken {
    token: Option<Token>,
}

impl SessionToken {
    pub fn new(token: Option<String>) -> Self {
        let token = token
            .map(|t| t.trim().to_owned())
            .filter(|t| !t.is_empty())
            .map(Token);

        Self { token }
    }
}

impl AuthProvider for SessionToken {
    fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    fn token(&self) -> Option<Token> {
        self.token.clone()
    }
}
