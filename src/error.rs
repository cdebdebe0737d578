use thiserror::Error;

pub type Result<T> = std::result::Result<T, CompileError>;

// every fault is fatal: one diagnostic naming the 1-based source line,
// then the whole run stops; there is no resynchronization
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Error in line {line}: {kind}")]
pub struct CompileError {
    pub line: u32,
    pub kind: ErrorKind,
}

impl CompileError {
    pub fn new(line: u32, kind: ErrorKind) -> Self {
        CompileError { line, kind }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ErrorKind {
    #[error("Invalid BASE declaration")]
    InvalidBase,

    // grammar violations: a character the current scan state doesn't accept
    #[error("Found '{found}' while looking for {expected}")]
    Unexpected { found: char, expected: &'static str },
    #[error("Unexpected character ('{0}') in word")]
    BadWordChar(char),
    #[error("Unexpected character ('{0}') in allophone list")]
    BadAllophoneChar(char),
    #[error("Empty word not allowed")]
    EmptyWord,
    #[error("Symbol 'words' can only be 1 character")]
    MultiCharSymbol,

    // token length ceilings
    #[error("Word '{0}' is too long")]
    WordTooLong(String),
    #[error("Suffix '{0}' is too long")]
    SuffixTooLong(String),
    #[error("Allophone '{0}' is too long")]
    AllophoneTooLong(String),

    #[error("Unknown allophone '{0}'")]
    UnknownAllophone(String),

    #[error("Exception word table overflows the 4K EPROM")]
    ImageOverflow,
}
