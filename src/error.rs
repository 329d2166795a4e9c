//! Appliance beacon errors

/// The error type for identity derivation and Bluetooth operations
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
    message: String,
}

impl Error {
    /// Creates an error of `kind` with an optional underlying cause and a free-form message.
    pub fn new(
        kind: ErrorKind,
        source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
        message: impl Into<String>,
    ) -> Self {
        Error {
            kind,
            source,
            message: message.into(),
        }
    }

    /// Returns the corresponding [ErrorKind] for this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the message for this error.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.message.is_empty(), &self.source) {
            (true, None) => write!(f, "{}", &self.kind),
            (false, None) => write!(f, "{}: {}", &self.kind, &self.message),
            (true, Some(err)) => write!(f, "{}: {}", &self.kind, err),
            (false, Some(err)) => write!(f, "{}: {} ({})", &self.kind, &self.message, err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|x| {
            let x: &(dyn std::error::Error + 'static) = &**x;
            x
        })
    }
}

/// A list of general categories of error.
#[non_exhaustive]
#[derive(Debug, displaydoc::Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorKind {
    /// network interfaces could not be enumerated
    InterfaceEnumeration,
    /// no network interface exposes a hardware address
    NoHardwareAddress,
    /// the Bluetooth adapter is not available
    AdapterUnavailable,
    /// the Bluetooth operation is unsupported
    NotSupported,
    /// permission denied
    NotAuthorized,
    /// not ready
    NotReady,
    /// not found
    NotFound,
    /// invalid parameter
    InvalidParameter,
    /// advertisement payload too large
    PayloadTooLarge,
    /// an internal error has occured
    Internal,
    /// error
    Other,
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error {
            kind,
            source: None,
            message: String::new(),
        }
    }
}

impl From<mac_address::MacAddressError> for Error {
    fn from(err: mac_address::MacAddressError) -> Self {
        Error::new(ErrorKind::InterfaceEnumeration, Some(Box::new(err)), String::new())
    }
}

/// The steps of the startup sequence, in the order they run.
#[derive(Debug, displaydoc::Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Step {
    /// deriving device identity
    DeriveIdentity,
    /// enabling adapter
    Enable,
    /// registering service
    RegisterService,
    /// configuring advertisement
    ConfigureAdvertisement,
    /// starting advertisement
    StartAdvertising,
}

impl Step {
    /// The process exit status used when this step fails.
    ///
    /// Status 1 is left for failures outside the startup sequence.
    pub fn exit_code(self) -> u8 {
        match self {
            Step::DeriveIdentity => 2,
            Step::Enable => 3,
            Step::RegisterService => 4,
            Step::ConfigureAdvertisement => 5,
            Step::StartAdvertising => 6,
        }
    }
}

/// A fatal failure of the startup sequence.
#[derive(Debug)]
pub struct StartupError {
    step: Step,
    error: Error,
}

impl StartupError {
    /// Wraps `error` as the failure of `step`.
    pub fn new(step: Step, error: Error) -> Self {
        StartupError { step, error }
    }

    /// The step that failed.
    pub fn step(&self) -> Step {
        self.step
    }

    /// The underlying error.
    pub fn error(&self) -> &Error {
        &self.error
    }

    /// Returns the [ErrorKind] of the underlying error.
    pub fn kind(&self) -> ErrorKind {
        self.error.kind()
    }

    /// The process exit status for this failure. See [`Step::exit_code`].
    pub fn exit_code(&self) -> u8 {
        self.step.exit_code()
    }
}

impl std::fmt::Display for StartupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} failed: {}", self.step, self.error)
    }
}

impl std::error::Error for StartupError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}
