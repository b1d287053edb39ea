//! Validated identifiers for the tenant, application, site and drive.

// self
use crate::_prelude::*;

// SharePoint composite site ids (`host,site-guid,web-guid`) run past 100 characters.
const IDENTIFIER_MAX_LEN: usize = 256;

/// Identifier value rejected during validation.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("{kind} identifier {problem}.")]
pub struct IdentifierError {
	/// Identifier kind, e.g. `Tenant` or `Drive`.
	pub kind: &'static str,
	/// What is wrong with the value.
	pub problem: IdentifierProblem,
}

/// Reason an identifier was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IdentifierProblem {
	/// Nothing was supplied.
	Empty,
	/// Whitespace appears somewhere in the value.
	Whitespace,
	/// More than the supported number of bytes.
	TooLong,
}
impl Display for IdentifierProblem {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Self::Empty => f.write_str("cannot be empty"),
			Self::Whitespace => f.write_str("contains whitespace"),
			Self::TooLong => write!(f, "exceeds {IDENTIFIER_MAX_LEN} characters"),
		}
	}
}

macro_rules! def_id {
	($(#[$meta:meta])* $name:ident => $kind:literal) => {
		$(#[$meta])*
		#[derive(Clone, PartialEq, Eq)]
		pub struct $name(String);
		impl $name {
			/// Validates `value` and wraps it.
			pub fn new(value: impl Into<String>) -> Result<Self, IdentifierError> {
				let value = value.into();

				check($kind, &value)?;

				Ok(Self(value))
			}
		}
		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				&self.0
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				write!(f, "{}({})", $kind, self.0)
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str(&self.0)
			}
		}
		impl FromStr for $name {
			type Err = IdentifierError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Self::new(s)
			}
		}
	};
}

def_id! {
	/// Directory (tenant) the application is registered in.
	TenantId => "Tenant"
}
def_id! {
	/// Application (client) id.
	ClientId => "Client"
}
def_id! {
	/// SharePoint site id as Graph reports it.
	SiteId => "Site"
}
def_id! {
	/// Document library (drive) id inside the site.
	DriveId => "Drive"
}
def_id! {
	/// Name of a provider descriptor, used in logs.
	ProviderId => "Provider"
}

fn check(kind: &'static str, value: &str) -> Result<(), IdentifierError> {
	let problem = if value.is_empty() {
		IdentifierProblem::Empty
	} else if value.chars().any(char::is_whitespace) {
		IdentifierProblem::Whitespace
	} else if value.len() > IDENTIFIER_MAX_LEN {
		IdentifierProblem::TooLong
	} else {
		return Ok(());
	};

	Err(IdentifierError { kind, problem })
}
