use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum CoreError {
    #[error("Record {row} has {found} shark flags but the roster lists {expected} sharks")]
    RosterMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },
}
