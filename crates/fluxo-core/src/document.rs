//! # Document Module
//!
//! CPF, CNPJ and phone normalisation and display masks.
//!
//! ## Masks
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Kind     Digits   Mask                    Example                      │
//! │  ────     ──────   ────                    ───────                      │
//! │  CPF      11       000.000.000-00          123.456.789-01               │
//! │  CNPJ     14       00.000.000/0000-00      12.345.678/9012-34           │
//! │  Phone    10       (00) 0000-0000          (11) 3456-7890               │
//! │  Mobile   11       (00) 00000-0000         (11) 98765-4321              │
//! │                                                                         │
//! │  Masks are applied progressively while typing: "1234" → "123.4"       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::error::ValidationError;

pub const CPF_LEN: usize = 11;
pub const CNPJ_LEN: usize = 14;
const PHONE_MAX_LEN: usize = 11;

// =============================================================================
// Digit Handling
// =============================================================================

/// Strips everything except ASCII digits. Idempotent.
///
/// ```rust
/// use fluxo_core::document::parse_digits;
///
/// assert_eq!(parse_digits("123.456.789-01"), "12345678901");
/// assert_eq!(parse_digits(&parse_digits("(11) 9")), "119");
/// ```
pub fn parse_digits(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).collect()
}

/// Applies a mask where each `#` consumes one digit.
///
/// Literal characters are only emitted when at least one more digit follows
/// them, which is what makes partial input render as "123.456" instead of
/// "123.456.".
fn apply_mask(digits: &str, mask: &str) -> String {
    let mut out = String::with_capacity(mask.len());
    let mut remaining = digits.chars().peekable();
    let mut pending = String::new();

    for slot in mask.chars() {
        if remaining.peek().is_none() {
            break;
        }
        if slot == '#' {
            out.push_str(&pending);
            pending.clear();
            if let Some(d) = remaining.next() {
                out.push(d);
            }
        } else {
            pending.push(slot);
        }
    }
    out
}

fn capped_digits(input: &str, max: usize) -> String {
    input.chars().filter(char::is_ascii_digit).take(max).collect()
}

// =============================================================================
// Formatters
// =============================================================================

/// Progressive CPF mask (`000.000.000-00`), capped at 11 digits.
pub fn format_cpf(input: &str) -> String {
    apply_mask(&capped_digits(input, CPF_LEN), "###.###.###-##")
}

/// Progressive CNPJ mask (`00.000.000/0000-00`), capped at 14 digits.
pub fn format_cnpj(input: &str) -> String {
    apply_mask(&capped_digits(input, CNPJ_LEN), "##.###.###/####-##")
}

/// Infers CPF or CNPJ from the digit count on every keystroke.
///
/// Up to 11 digits the CPF mask is applied; beyond that the CNPJ mask takes
/// over (capped at 14 digits).
///
/// ```rust
/// use fluxo_core::document::format_cpf_or_cnpj;
///
/// assert_eq!(format_cpf_or_cnpj("12345678901"), "123.456.789-01");
/// assert_eq!(format_cpf_or_cnpj("12345678901234"), "12.345.678/9012-34");
/// ```
pub fn format_cpf_or_cnpj(input: &str) -> String {
    let digits = capped_digits(input, CNPJ_LEN);
    match DocumentKind::infer(digits.len()) {
        DocumentKind::Cpf => format_cpf(&digits),
        DocumentKind::Cnpj => format_cnpj(&digits),
    }
}

/// Progressive phone mask.
///
/// Ten digits render as a landline `(11) 3456-7890`; eleven as a mobile
/// `(11) 98765-4321`. Shorter input is partially masked.
pub fn format_phone(input: &str) -> String {
    let digits = capped_digits(input, PHONE_MAX_LEN);
    let mask = if digits.len() == PHONE_MAX_LEN {
        "(##) #####-####"
    } else {
        "(##) ####-####"
    };
    apply_mask(&digits, mask)
}

// =============================================================================
// Document
// =============================================================================

/// Brazilian taxpayer id kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "UPPERCASE")]
pub enum DocumentKind {
    /// Cadastro de Pessoas Físicas (individuals).
    Cpf,
    /// Cadastro Nacional da Pessoa Jurídica (companies).
    Cnpj,
}

impl DocumentKind {
    /// More than 11 digits means CNPJ.
    #[inline]
    pub const fn infer(digit_count: usize) -> Self {
        if digit_count > CPF_LEN {
            DocumentKind::Cnpj
        } else {
            DocumentKind::Cpf
        }
    }

    #[inline]
    pub const fn digit_len(&self) -> usize {
        match self {
            DocumentKind::Cpf => CPF_LEN,
            DocumentKind::Cnpj => CNPJ_LEN,
        }
    }
}

/// A complete CPF or CNPJ, stored as bare digits.
///
/// Deserialization goes through [`Document::parse`], so a decoded value
/// always holds exactly as many digits as its kind requires.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(try_from = "DocumentFields")]
pub struct Document {
    digits: String,
    kind: DocumentKind,
}

/// Wire shape of a [`Document`] before validation.
#[derive(Deserialize)]
struct DocumentFields {
    digits: String,
    kind: DocumentKind,
}

impl TryFrom<DocumentFields> for Document {
    type Error = ValidationError;

    fn try_from(fields: DocumentFields) -> Result<Self, Self::Error> {
        let document = Document::parse(&fields.digits)?;
        if document.kind != fields.kind {
            return Err(ValidationError::InvalidFormat {
                field: "documento".to_string(),
                reason: format!(
                    "{} digits do not form a {:?}",
                    document.digits.len(),
                    fields.kind
                ),
            });
        }
        Ok(document)
    }
}

impl Document {
    /// Parses a masked or bare document.
    ///
    /// ## Rules
    /// - Exactly 11 (CPF) or 14 (CNPJ) digits after stripping the mask
    ///
    /// ```rust
    /// use fluxo_core::document::{Document, DocumentKind};
    ///
    /// let doc = Document::parse("12.345.678/9012-34").unwrap();
    /// assert_eq!(doc.kind(), DocumentKind::Cnpj);
    /// assert!(Document::parse("123").is_err());
    /// ```
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let digits = parse_digits(input);
        if digits.is_empty() {
            return Err(ValidationError::Required {
                field: "documento".to_string(),
            });
        }

        let kind = match digits.len() {
            CPF_LEN => DocumentKind::Cpf,
            CNPJ_LEN => DocumentKind::Cnpj,
            n => {
                return Err(ValidationError::InvalidFormat {
                    field: "documento".to_string(),
                    reason: format!("expected 11 (CPF) or 14 (CNPJ) digits, got {n}"),
                })
            }
        };

        Ok(Document { digits, kind })
    }

    pub fn digits(&self) -> &str {
        &self.digits
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    /// Display mask for this document's kind.
    pub fn masked(&self) -> String {
        match self.kind {
            DocumentKind::Cpf => format_cpf(&self.digits),
            DocumentKind::Cnpj => format_cnpj(&self.digits),
        }
    }

    /// Checks the two mod-11 verification digits.
    ///
    /// Sequences of a single repeated digit ("111.111.111-11") pass the
    /// arithmetic but are rejected, as the Receita Federal does.
    pub fn has_valid_check_digits(&self) -> bool {
        let digits: Vec<u32> = self.digits.chars().filter_map(|c| c.to_digit(10)).collect();
        if digits.len() != self.kind.digit_len() || digits.windows(2).all(|w| w[0] == w[1]) {
            return false;
        }

        let body_len = self.kind.digit_len() - 2;
        let first = check_digit(&digits[..body_len], self.kind);
        let second = check_digit(&digits[..body_len + 1], self.kind);
        digits[body_len] == first && digits[body_len + 1] == second
    }
}

/// Computes one verification digit over `body`.
fn check_digit(body: &[u32], kind: DocumentKind) -> u32 {
    let sum: u32 = match kind {
        // CPF weights count down from len+1 to 2
        DocumentKind::Cpf => body
            .iter()
            .zip((2..=body.len() as u32 + 1).rev())
            .map(|(d, w)| d * w)
            .sum(),
        // CNPJ weights cycle 2..=9 from the right
        DocumentKind::Cnpj => body
            .iter()
            .rev()
            .zip((2..=9).cycle())
            .map(|(d, w)| d * w)
            .sum(),
    };
    match sum % 11 {
        0 | 1 => 0,
        r => 11 - r,
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.masked())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
