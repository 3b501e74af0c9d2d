mod logging;

#[macro_export]
macro_rules! map_io_error {
    ($msg:expr) => {
        |_: _| std::io::Error::new(std::io::ErrorKind::InvalidData, $msg)
    };
}

#[macro_export]
macro_rules! io_error {
    ($msg:expr) => {
        std::io::Error::new(std::io::ErrorKind::InvalidData, $msg)
    };
}

pub use logging::init_logging;
