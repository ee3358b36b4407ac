//! Home-directory marker expansion for path and URL strings.

use crate::system::{SystemAccess, USER_HOME};

/// URL scheme prefixes preserved verbatim ahead of the marker, longest first.
const SCHEME_PREFIXES: [&str; 2] = ["jar:file:", "file:"];

/// Expand a leading `~` marker into the user's home directory.
///
/// An optional `file:` or `jar:file:` scheme prefix is carried through
/// unchanged; only the single marker immediately after it is substituted.
/// Everything following the marker is copied verbatim: no separator
/// normalisation takes place, so a Windows-style home value followed by a
/// Unix-style suffix (or vice versa) yields mixed separators by design.
///
/// Inputs without a marker come back unchanged, as do inputs whose home
/// directory cannot be resolved from `system`.
///
/// # Examples
///
/// ```
/// use confbind::{SystemSnapshot, USER_HOME, expand_user_home};
///
/// let system = SystemSnapshot::default().with_property(USER_HOME, "/home/john");
/// assert_eq!(expand_user_home("~/foo/bar/", &system), "/home/john/foo/bar/");
/// assert_eq!(
///     expand_user_home("jar:file:~/foo/", &system),
///     "jar:file:/home/john/foo/"
/// );
/// assert_eq!(expand_user_home("/etc/app.conf", &system), "/etc/app.conf");
/// ```
#[must_use]
pub fn expand_user_home(input: &str, system: &dyn SystemAccess) -> String {
    let (scheme, rest) = split_scheme(input);
    let Some(suffix) = rest.strip_prefix('~') else {
        return input.to_owned();
    };
    let Some(home) = system.property(USER_HOME) else {
        return input.to_owned();
    };
    let mut expanded = String::with_capacity(scheme.len() + home.len() + suffix.len());
    expanded.push_str(scheme);
    expanded.push_str(&home);
    expanded.push_str(suffix);
    expanded
}

/// Split a recognised scheme prefix off the front of `input`.
fn split_scheme(input: &str) -> (&str, &str) {
    for prefix in SCHEME_PREFIXES {
        if let Some(rest) = input.strip_prefix(prefix) {
            return (prefix, rest);
        }
    }
    ("", input)
}
