use bookstore_db::{Author, AuthorId};
use serde::{Deserialize, Serialize};

/// Author as exposed by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorView {
    pub id: AuthorId,
    pub name: String,
}

impl From<Author> for AuthorView {
    fn from(author: Author) -> Self {
        Self {
            id: author.id,
            name: author.name,
        }
    }
}
