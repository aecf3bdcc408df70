use percent_encoding::AsciiSet;
use percent_encoding::NON_ALPHANUMERIC;
use std::time::Duration;

// Query parameters every signed request carries.
pub const QUERY_DEVELOPER_ID: &str = "developerId";
pub const QUERY_RTICK: &str = "rtick";
pub const QUERY_SIGN_TYPE: &str = "signType";
pub const QUERY_SIGN: &str = "sign";

/// The only signature type the platform speaks on the outbound channel.
pub const SIGN_TYPE_RSA: &str = "rsa";

/// Local errno synthesized when the transport fails before a well-formed
/// response arrives.
pub const ERRNO_TRANSPORT: i64 = 100002;

/// Default per-attempt timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(20_000);

/// Default number of additional attempts after a failed one.
pub const DEFAULT_RETRY: usize = 2;

/// AsciiSet matching JavaScript's `encodeURIComponent`.
///
/// Escapes every byte except 'A'-'Z', 'a'-'z', '0'-'9', and `- _ . ! ~ * ' ( )`.
/// The signature is the only query value that gets escaped on the wire; the
/// remote side decodes it with the same rules.
pub static SIGNATURE_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');
