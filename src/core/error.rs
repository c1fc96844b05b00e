use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum SingularisError {
    Parse(String),
    Compile(String),
    Simulation(String),
    InvalidOperation(String),
    Glyph { line: usize, message: String },
    Config(String),
    Io(String),
}

impl fmt::Display for SingularisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SingularisError::Parse(msg) => write!(f, "Parse Error: {}", msg),
            SingularisError::Compile(msg) => write!(f, "Compile Error: {}", msg),
            SingularisError::Simulation(msg) => write!(f, "Simulation Error: {}", msg),
            SingularisError::InvalidOperation(msg) => write!(f, "Invalid Operation: {}", msg),
            SingularisError::Glyph { line, message } => {
                write!(f, "Glyph Error (line {}): {}", line, message)
            }
            SingularisError::Config(msg) => write!(f, "Config Error: {}", msg),
            SingularisError::Io(msg) => write!(f, "IO Error: {}", msg),
        }
    }
}

impl std::error::Error for SingularisError {}

impl From<std::io::Error> for SingularisError {
    fn from(e: std::io::Error) -> Self {
        SingularisError::Io(e.to_string())
    }
}

impl SingularisError {
    pub fn compile(message: &str) -> Self { SingularisError::Compile(message.to_string()) }
    pub fn simulation(message: &str) -> Self { SingularisError::Simulation(message.to_string()) }
    pub fn invalid_operation(message: &str) -> Self { SingularisError::InvalidOperation(message.to_string()) }
    pub fn glyph(line: usize, message: &str) -> Self {
        SingularisError::Glyph { line, message: message.to_string() }
    }
}

pub type Result<T> = std::result::Result<T, SingularisError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test] fn test_compile_error() {
        let err = SingularisError::compile("Code is empty");
        assert_eq!(format!("{}", err), "Compile Error: Code is empty");
    }
    #[test] fn test_simulation_error() {
        let err = SingularisError::simulation("too many qubits");
        assert_eq!(format!("{}", err), "Simulation Error: too many qubits");
    }
    #[test] fn test_glyph_error_carries_line() {
        let err = SingularisError::glyph(3, "unknown glyph '🦄'");
        assert_eq!(format!("{}", err), "Glyph Error (line 3): unknown glyph '🦄'");
    }
    #[test] fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.sp");
        let err: SingularisError = io.into();
        assert!(matches!(err, SingularisError::Io(ref m) if m.contains("missing.sp")));
    }
}
