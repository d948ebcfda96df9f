//! Shared constants for the attendance client.

/// Default remote attendance service endpoint
pub const DEFAULT_API_BASE_URL: &str = "https://puce.estudioika.com/api/examen.php";

/// Default location of the persisted session store
pub const DEFAULT_SESSION_PATH: &str = "session.json";

/// Records shown per history page
pub const PAGE_SIZE: usize = 5;

/// Delay between an accepted check-in and the follow-up history fetch (milliseconds)
pub const DEFAULT_REFRESH_DELAY_MS: u64 = 1000;

/// Transport timeout for a single request to the attendance service (seconds)
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Substring of the service's `message` field that confirms a check-in
pub const CONFIRMATION_MARKER: &str = "correctamente";

/// Days added to a stored record date to obtain the attendance's logical date.
///
/// The service persists dates one day behind the day they were taken. The
/// cause is undocumented upstream, so the shift is applied as-is.
pub const CALENDAR_SHIFT_DAYS: i64 = 1;

/// Hours subtracted from a stored wall-clock time before display and comparison.
///
/// Compensates a fixed offset in the service's clock; kept as-is for the
/// same reason as [`CALENDAR_SHIFT_DAYS`].
pub const CLOCK_OFFSET_HOURS: i64 = 1;

/// Expected check-in hour for weekdays without a specific rule
pub const DEFAULT_EXPECTED_HOUR: u32 = 8;

/// Expected check-in minute for weekdays without a specific rule
pub const DEFAULT_EXPECTED_MINUTE: u32 = 0;

/// Session store keys (mirrors the keys written by the login flow)
pub mod session_keys {
    /// Numeric record identifier of the enrolled person
    pub const RECORD: &str = "RECORD";

    /// Identity document number
    pub const ID: &str = "ID";

    /// Given names
    pub const NAME: &str = "NAME";

    /// Family names
    pub const LASTNAME: &str = "LASTNAME";

    /// Login user name
    pub const USER: &str = "USER";
}

/// User-facing notice texts
pub mod messages {
    pub const SESSION_MISSING: &str =
        "Error: Datos de sesión no encontrados. Vuelva a iniciar sesión.";
    pub const MISSING_INPUT: &str = "Por favor, ingrese ambos dígitos";
    pub const DIGIT_MISMATCH: &str = "Dígitos incorrectos. Intente nuevamente.";
    pub const CHECK_IN_ACCEPTED: &str = "¡Asistencia registrada correctamente!";
    pub const CHECK_IN_REJECTED: &str = "Error al registrar asistencia";
    pub const CHECK_IN_TRANSPORT: &str = "Error de conexión al registrar asistencia";
    pub const FETCH_FAILED: &str = "Error al cargar asistencias";
    pub const SUBMISSION_IN_FLIGHT: &str = "Registrando...";
    pub const INVALID_IDENTITY: &str = "Número de cédula inválido en la sesión";
    pub const CONFIG: &str = "Error de configuración";
}
