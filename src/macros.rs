//===========================================================================//

macro_rules! invalid_format {
    ($e:expr) => {
        return Err($crate::error::IcoError::InvalidFormat(
            ::std::string::String::from($e),
        ))
    };
    ($fmt:expr, $($arg:tt)+) => {
        return Err($crate::error::IcoError::InvalidFormat(
            format!($fmt, $($arg)+),
        ))
    };
}

macro_rules! malformed_header {
    ($e:expr) => {
        return Err($crate::error::IcoError::MalformedHeader(
            ::std::string::String::from($e),
        ))
    };
    ($fmt:expr, $($arg:tt)+) => {
        return Err($crate::error::IcoError::MalformedHeader(
            format!($fmt, $($arg)+),
        ))
    };
}

macro_rules! truncated_data {
    ($e:expr) => {
        return Err($crate::error::IcoError::TruncatedData(
            ::std::string::String::from($e),
        ))
    };
    ($fmt:expr, $($arg:tt)+) => {
        return Err($crate::error::IcoError::TruncatedData(
            format!($fmt, $($arg)+),
        ))
    };
}

//===========================================================================//
