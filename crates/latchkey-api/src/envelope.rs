// Response envelope, signatures, and strict narrowing.
//
// Every device response is wrapped in `{status, code?, message?, data,
// timestamp?}`; list responses add `pagination`. A `Signature` names the
// full shape a variant must have, and `Reply::narrow` turns a raw
// envelope into a typed success or failure at construction time.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{Display, EnumString, IntoStaticStr};

use crate::error::{DEFAULT_ERROR_CODE, DEFAULT_ERROR_MESSAGE, Error};

// ── Status ──────────────────────────────────────────────────────────

/// The `status` tag of an envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

// ── Pagination ──────────────────────────────────────────────────────

/// Paging block carried by every list response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Pagination {
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
    pub total_pages: u32,
}

impl Pagination {
    /// `ceil(total / per_page)`, the page count consumers assume.
    pub fn expected_total_pages(&self) -> u64 {
        if self.per_page == 0 {
            return 0;
        }
        self.total.div_ceil(u64::from(self.per_page))
    }

    /// Whether `total_pages` agrees with `total` and `per_page`.
    ///
    /// Informational only; nothing in the client rejects a mismatch.
    pub fn is_consistent(&self) -> bool {
        u64::from(self.total_pages) == self.expected_total_pages()
    }
}

/// One page of a list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Option<Pagination>,
}

// ── Envelope ────────────────────────────────────────────────────────

/// Raw, undiscriminated device response.
///
/// Fields are kept loose on purpose: `code` may be numeric or a string,
/// `data` may be anything. Use a [`Signature`] or [`Reply::narrow`] before
/// trusting the payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub code: Option<Value>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub timestamp: Option<i64>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
    /// Top-level fields outside the common envelope (`current_connection`,
    /// `count`, `error`, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Envelope {
    /// Parse a response body. Anything that is not a JSON object is rejected.
    pub fn parse(body: &str) -> Result<Self, Error> {
        let value: Value = serde_json::from_str(body).map_err(|e| invalid(&e, body))?;
        if !value.is_object() {
            return Err(Error::InvalidResponse {
                reason: "response body is not a JSON object".into(),
                body: body.to_owned(),
            });
        }
        serde_json::from_value(value).map_err(|e| invalid(&e, body))
    }

    pub fn status(&self) -> Option<Status> {
        self.status.as_deref().and_then(|s| s.parse().ok())
    }

    /// Numeric `code`, if present. String codes yield `None`.
    pub fn code(&self) -> Option<u16> {
        self.code
            .as_ref()
            .and_then(Value::as_u64)
            .and_then(|c| u16::try_from(c).ok())
    }

    /// `code` rendered as text, whatever its JSON type.
    pub fn code_text(&self) -> Option<String> {
        match self.code.as_ref()? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Whether `data.<field>` is present and not null.
    pub fn has_data_field(&self, field: &str) -> bool {
        self.data.get(field).is_some_and(|v| !v.is_null())
    }

    /// Decode `data` into `T`.
    pub fn decode_data<T: DeserializeOwned>(&self) -> Result<T, Error> {
        serde_json::from_value(self.data.clone()).map_err(|e| Error::InvalidResponse {
            reason: format!("data does not match the declared shape: {e}"),
            body: self.data.to_string(),
        })
    }

    /// Decode `data` as a list and attach the pagination block.
    pub fn decode_page<T: DeserializeOwned>(&self) -> Result<Page<T>, Error> {
        let items = if self.data.is_null() {
            Vec::new()
        } else {
            self.decode_data()?
        };
        Ok(Page {
            items,
            pagination: self.pagination,
        })
    }
}

impl Envelope {
    /// Match against `success` without decoding `data`.
    ///
    /// The outer error is a malformed response; the inner one a failure the
    /// device signaled with `status: "error"`.
    pub fn check(self, success: &Signature) -> Result<Result<Self, Failure>, Error> {
        if success.matches(&self) {
            return Ok(Ok(self));
        }
        if self.status() == Some(Status::Error) {
            return Ok(Err(Failure::from_envelope(self)));
        }
        Err(Error::InvalidResponse {
            reason: format!(
                "expected status={} codes={:?}, got status={:?} code={:?}",
                success.status, success.codes, self.status, self.code
            ),
            body: serde_json::to_string(&self).unwrap_or_default(),
        })
    }
}

fn invalid(err: &serde_json::Error, body: &str) -> Error {
    let preview: String = body.chars().take(200).collect();
    Error::InvalidResponse {
        reason: format!("{err} (body preview: {preview:?})"),
        body: body.to_owned(),
    }
}

// ── Signature ───────────────────────────────────────────────────────

/// The complete shape a response variant must match.
///
/// `codes` empty means "any code, or none"; `required` fields must all be
/// present in `data`; when `any_of` is non-empty at least one of its
/// fields must be present.
#[derive(Debug, Clone, Copy)]
pub struct Signature {
    pub status: Status,
    pub codes: &'static [u16],
    pub required: &'static [&'static str],
    pub any_of: &'static [&'static str],
}

impl Signature {
    /// Status tag only.
    pub const fn status(status: Status) -> Self {
        Self {
            status,
            codes: &[],
            required: &[],
            any_of: &[],
        }
    }

    /// Status tag plus one of `codes`.
    pub const fn coded(status: Status, codes: &'static [u16]) -> Self {
        Self {
            status,
            codes,
            required: &[],
            any_of: &[],
        }
    }

    pub const fn requiring(mut self, fields: &'static [&'static str]) -> Self {
        self.required = fields;
        self
    }

    pub const fn requiring_any(mut self, fields: &'static [&'static str]) -> Self {
        self.any_of = fields;
        self
    }

    /// Pure predicate: does `env` match every part of this signature?
    pub fn matches(&self, env: &Envelope) -> bool {
        if env.status() != Some(self.status) {
            return false;
        }
        if !self.codes.is_empty() && !env.code().is_some_and(|c| self.codes.contains(&c)) {
            return false;
        }
        if !self.required.iter().all(|f| env.has_data_field(f)) {
            return false;
        }
        self.any_of.is_empty() || self.any_of.iter().any(|f| env.has_data_field(f))
    }
}

/// `status == "success"`, no further constraints.
pub const SUCCESS: Signature = Signature::status(Status::Success);

/// `status == "error"` with code 401.
pub const AUTH_ERROR: Signature = Signature::coded(Status::Error, &[401]);

/// `status == "error"` with code 409.
pub const CONFLICT_ERROR: Signature = Signature::coded(Status::Error, &[409]);

/// `status == "error"` with code 500.
pub const OPERATION_ERROR: Signature = Signature::coded(Status::Error, &[500]);

pub fn is_auth_error(env: &Envelope) -> bool {
    AUTH_ERROR.matches(env)
}

pub fn is_operation_error(env: &Envelope) -> bool {
    OPERATION_ERROR.matches(env)
}

/// `status == "error"` with a numeric code and a message.
pub fn is_api_error(env: &Envelope) -> bool {
    env.status() == Some(Status::Error) && env.code().is_some() && env.message.is_some()
}

// ── Reply ───────────────────────────────────────────────────────────

/// Why the device refused a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Unauthorized,
    Conflict,
    Operation,
    Other,
}

/// Narrowed success variant.
#[derive(Debug, Clone, PartialEq)]
pub struct Success<T> {
    pub code: Option<u16>,
    pub message: Option<String>,
    pub timestamp: Option<i64>,
    pub data: T,
}

/// Success whose `data` the caller does not inspect.
pub type Ack = Success<Value>;

/// Narrowed server-signaled failure.
#[derive(Debug, Clone, PartialEq)]
pub struct Failure {
    pub kind: FailureKind,
    pub code: Option<String>,
    pub message: Option<String>,
    pub data: Value,
}

impl Failure {
    fn from_envelope(env: Envelope) -> Self {
        let kind = if AUTH_ERROR.matches(&env) {
            FailureKind::Unauthorized
        } else if CONFLICT_ERROR.matches(&env) {
            FailureKind::Conflict
        } else if OPERATION_ERROR.matches(&env) {
            FailureKind::Operation
        } else {
            FailureKind::Other
        };
        Self {
            kind,
            code: env.code_text(),
            message: env.message,
            data: env.data,
        }
    }

    /// Message to show a user, with the generic fallback.
    pub fn display_message(&self) -> &str {
        self.message.as_deref().unwrap_or(DEFAULT_ERROR_MESSAGE)
    }

    /// Normalize into the crate error type.
    pub fn into_error(self, status: Option<u16>) -> Error {
        let message = self
            .message
            .unwrap_or_else(|| DEFAULT_ERROR_MESSAGE.to_owned());
        match self.kind {
            FailureKind::Unauthorized => Error::Unauthorized { message },
            FailureKind::Conflict => Error::Conflict {
                message,
                data: self.data,
            },
            FailureKind::Operation | FailureKind::Other => {
                let status = status.or_else(|| self.code.as_deref().and_then(|c| c.parse().ok()));
                Error::Api {
                    message,
                    code: self.code.unwrap_or_else(|| DEFAULT_ERROR_CODE.to_owned()),
                    status,
                }
            }
        }
    }
}

/// A response narrowed against a success signature.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply<T> {
    Success(Success<T>),
    Failure(Failure),
}

impl<T: DeserializeOwned> Reply<T> {
    /// Narrow `env` against `success`.
    ///
    /// Yields `Success` only when the whole signature matches and `data`
    /// decodes into `T`; `Failure` when the device said `status: "error"`;
    /// `Error::InvalidResponse` for anything else.
    pub fn narrow(env: Envelope, success: &Signature) -> Result<Self, Error> {
        match env.check(success)? {
            Ok(env) => {
                let data = env.decode_data()?;
                Ok(Self::Success(Success {
                    code: env.code(),
                    message: env.message,
                    timestamp: env.timestamp,
                    data,
                }))
            }
            Err(failure) => Ok(Self::Failure(failure)),
        }
    }
}

impl<T> Reply<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// The success payload, or the failure normalized into an [`Error`].
    pub fn into_result(self) -> Result<Success<T>, Error> {
        match self {
            Self::Success(s) => Ok(s),
            Self::Failure(f) => Err(f.into_error(None)),
        }
    }

    pub fn into_data(self) -> Result<T, Error> {
        self.into_result().map(|s| s.data)
    }
}
