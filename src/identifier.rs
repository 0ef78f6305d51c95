//! Table and column name validation.
//!
//! Values are always bound as parameters, but table and column names have to
//! be written into the SQL text. Every such name passes through [`validate`]
//! first, and is then double-quoted by [`quote_identifier`].

use std::sync::OnceLock;

use regex::Regex;

use crate::Error;

fn identifier_pattern() -> &'static Regex {
   static RE: OnceLock<Regex> = OnceLock::new();
   RE.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("invalid regex"))
}

/// Check that `identifier` is safe to interpolate as a table or column name.
///
/// Accepts ASCII letters, digits and underscores, not starting with a digit.
pub fn validate(identifier: &str) -> Result<(), Error> {
   if identifier_pattern().is_match(identifier) {
      Ok(())
   } else {
      Err(Error::InvalidIdentifier {
         name: identifier.to_string(),
      })
   }
}

/// Validate every name in `identifiers`, failing on the first bad one.
pub fn validate_all<'a, I>(identifiers: I) -> Result<(), Error>
where
   I: IntoIterator<Item = &'a str>,
{
   identifiers.into_iter().try_for_each(validate)
}

/// Quote a validated identifier with double quotes.
///
/// Any embedded double quotes are doubled per SQL standard (`"` → `""`).
pub(crate) fn quote_identifier(name: &str) -> String {
   format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
   use super::*;

   #[test]
   fn accepts_plain_names() {
      assert!(validate("users").is_ok());
      assert!(validate("created_at").is_ok());
      assert!(validate("_private").is_ok());
      assert!(validate("col_123").is_ok());
      assert!(validate("X").is_ok());
   }

   #[test]
   fn rejects_empty() {
      assert!(validate("").is_err());
   }

   #[test]
   fn rejects_leading_digit() {
      assert!(validate("1users").is_err());
   }

   #[test]
   fn rejects_injection_attempts() {
      for name in [
         "name;DROP",
         "users; DROP TABLE users --",
         "id)--",
         "col name",
         "invalid-table!",
         "users.id",
         "\"users\"",
         "users\n",
      ] {
         assert!(
            matches!(validate(name), Err(Error::InvalidIdentifier { .. })),
            "{name:?} should be rejected"
         );
      }
   }

   #[test]
   fn rejects_non_ascii_letters() {
      assert!(validate("usuário").is_err());
   }

   #[test]
   fn validate_all_reports_first_invalid_name() {
      let err = validate_all(["name", "bad name", "worse;"]).unwrap_err();
      match err {
         Error::InvalidIdentifier { name } => assert_eq!(name, "bad name"),
         other => panic!("unexpected error: {other:?}"),
      }
      assert!(validate_all(["id", "name", "email"]).is_ok());
   }

   #[test]
   fn quote_identifier_simple() {
      assert_eq!(quote_identifier("users"), r#""users""#);
   }

   #[test]
   fn quote_identifier_doubles_embedded_quotes() {
      assert_eq!(quote_identifier(r#"a"b"#), r#""a""b""#);
   }
}
