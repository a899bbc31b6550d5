//! Form validation rules.
//!
//! Every rule is a pure function of the raw field values. Fields are checked
//! independently, with one exception: the confirmation field is compared
//! against the password, and a mismatch is reported on the confirmation field.
//!
//! | Field            | Rule                                                  |
//! |------------------|-------------------------------------------------------|
//! | title            | 3 to 30 characters                                    |
//! | description      | 3 to 300 characters                                   |
//! | name             | 3 to 30 characters                                    |
//! | email            | `local@domain.tld` grammar (see [`is_valid_email`])   |
//! | password         | at least 8 characters, lower + upper + digit + symbol |
//! | confirmPassword  | identical to password                                 |
//!
//! Lengths are counted in `char`s, not bytes.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::RangeInclusive;

pub const TITLE_LEN: RangeInclusive<usize> = 3..=30;
pub const DESCRIPTION_LEN: RangeInclusive<usize> = 3..=300;
pub const NAME_LEN: RangeInclusive<usize> = 3..=30;
pub const PASSWORD_MIN_LEN: usize = 8;

/// Symbols that satisfy the "special character" password requirement.
pub const PASSWORD_SYMBOLS: &str = "@$!%*?&";

const INVALID_EMAIL: &str = "Invalid email address";
const PASSWORD_TOO_SHORT: &str = "Password must be at least 8 characters";
const PASSWORD_TOO_WEAK: &str =
    "Password must contain uppercase, lowercase, number and special character";
const PASSWORDS_DIFFER: &str = "Passwords don't match";

/// A named form input that can carry an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Title,
    Description,
    Name,
    Email,
    Password,
    ConfirmPassword,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Description => "description",
            Field::Name => "name",
            Field::Email => "email",
            Field::Password => "password",
            Field::ConfirmPassword => "confirmPassword",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field-scoped validation failures. Empty means the form is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<Field, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `error` against `field` when there is one.
    pub fn with(mut self, field: Field, error: Option<String>) -> Self {
        if let Some(message) = error {
            self.0.insert(field, message);
        }
        self
    }

    pub fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }

    /// Keeps only the errors whose field satisfies `keep`.
    pub fn retain(&mut self, mut keep: impl FnMut(Field) -> bool) {
        self.0.retain(|field, _| keep(*field));
    }

    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (field, message)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", field, message)?;
        }
        Ok(())
    }
}

fn check_length(label: &str, value: &str, bounds: RangeInclusive<usize>) -> Option<String> {
    let len = value.chars().count();
    if len < *bounds.start() {
        Some(format!(
            "{} must be at least {} characters",
            label,
            bounds.start()
        ))
    } else if len > *bounds.end() {
        Some(format!("{} must be at most {} characters", label, bounds.end()))
    } else {
        None
    }
}

pub fn check_title(value: &str) -> Option<String> {
    check_length("Title", value, TITLE_LEN)
}

pub fn check_description(value: &str) -> Option<String> {
    check_length("Description", value, DESCRIPTION_LEN)
}

pub fn check_name(value: &str) -> Option<String> {
    check_length("Name", value, NAME_LEN)
}

pub fn check_email(value: &str) -> Option<String> {
    if is_valid_email(value) {
        None
    } else {
        Some(INVALID_EMAIL.to_string())
    }
}

pub fn check_password(value: &str) -> Option<String> {
    if value.chars().count() < PASSWORD_MIN_LEN {
        return Some(PASSWORD_TOO_SHORT.to_string());
    }
    if CharClasses::of(value).complete() {
        None
    } else {
        Some(PASSWORD_TOO_WEAK.to_string())
    }
}

/// Compares byte-for-byte; no trimming or normalization.
pub fn check_confirm_password(password: &str, confirm: &str) -> Option<String> {
    if password == confirm {
        None
    } else {
        Some(PASSWORDS_DIFFER.to_string())
    }
}

pub fn validate_note(title: &str, description: &str) -> FieldErrors {
    FieldErrors::new()
        .with(Field::Title, check_title(title))
        .with(Field::Description, check_description(description))
}

pub fn validate_login(email: &str, password: &str) -> FieldErrors {
    FieldErrors::new()
        .with(Field::Email, check_email(email))
        .with(Field::Password, check_password(password))
}

pub fn validate_registration(
    name: &str,
    email: &str,
    password: &str,
    confirm_password: &str,
) -> FieldErrors {
    FieldErrors::new()
        .with(Field::Name, check_name(name))
        .with(Field::Email, check_email(email))
        .with(Field::Password, check_password(password))
        .with(
            Field::ConfirmPassword,
            check_confirm_password(password, confirm_password),
        )
}

pub fn validate_profile(name: &str, email: &str) -> FieldErrors {
    FieldErrors::new()
        .with(Field::Name, check_name(name))
        .with(Field::Email, check_email(email))
}

/// Checks `value` against a conventional email grammar.
///
/// # Rules
/// - Exactly one `@`
/// - Local part: letters, digits and `_'+-.`; must not start with `.`, contain
///   `..`, or end with `.` or `'`
/// - Domain: two or more dot-separated labels, each starting with a letter or
///   digit and made of letters, digits and `-`; the last label is two or more
///   letters
///
/// # Examples
/// ```
/// use notely::validation::is_valid_email;
///
/// assert!(is_valid_email("ada@example.com"));
/// assert!(is_valid_email("first.last+tag@mail.example.org"));
///
/// assert!(!is_valid_email("not-an-email"));
/// assert!(!is_valid_email("ada@localhost"));
/// assert!(!is_valid_email(".ada@example.com"));
/// ```
pub fn is_valid_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if domain.contains('@') {
        return false;
    }
    is_valid_local_part(local) && is_valid_domain(domain)
}

fn is_valid_local_part(local: &str) -> bool {
    if local.is_empty() || local.starts_with('.') || local.contains("..") {
        return false;
    }
    if !local
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || "_'+-.".contains(c))
    {
        return false;
    }
    local
        .chars()
        .last()
        .is_some_and(|c| c.is_ascii_alphanumeric() || "_+-".contains(c))
}

fn is_valid_domain(domain: &str) -> bool {
    let labels: Vec<&str> = domain.split('.').collect();
    let Some((tld, hosts)) = labels.split_last() else {
        return false;
    };
    if hosts.is_empty() {
        return false;
    }
    let tld_ok = tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic());
    tld_ok
        && hosts.iter().all(|label| {
            label
                .chars()
                .next()
                .is_some_and(|c| c.is_ascii_alphanumeric())
                && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        })
}

#[derive(Debug, Default, Clone, Copy)]
struct CharClasses {
    lower: bool,
    upper: bool,
    digit: bool,
    symbol: bool,
}

impl CharClasses {
    fn of(value: &str) -> Self {
        value.chars().fold(Self::default(), |mut classes, c| {
            classes.lower |= c.is_ascii_lowercase();
            classes.upper |= c.is_ascii_uppercase();
            classes.digit |= c.is_ascii_digit();
            classes.symbol |= PASSWORD_SYMBOLS.contains(c);
            classes
        })
    }

    fn complete(&self) -> bool {
        self.lower && self.upper && self.digit && self.symbol
    }
}

/// Password strength meter shown next to the registration password field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PasswordStrength(u8);

const STRENGTH_LABELS: [&str; 5] = ["Very Weak", "Weak", "Fair", "Good", "Strong"];

impl PasswordStrength {
    /// One point each for: minimum length, uppercase, lowercase, digit, symbol.
    pub fn of(password: &str) -> Self {
        let classes = CharClasses::of(password);
        let score = [
            password.chars().count() >= PASSWORD_MIN_LEN,
            classes.upper,
            classes.lower,
            classes.digit,
            classes.symbol,
        ]
        .iter()
        .filter(|hit| **hit)
        .count();
        Self(score as u8)
    }

    pub fn score(&self) -> u8 {
        self.0
    }

    /// `None` for an empty score.
    pub fn label(&self) -> Option<&'static str> {
        match self.0 {
            0 => None,
            n => STRENGTH_LABELS.get(usize::from(n) - 1).copied(),
        }
    }
}
