//! # Domain Types
//!
//! The closed vocabularies the calculator understands.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌───────────────────┐   ┌─────────────────┐     │
//! │  │  OperationKind  │   │ ScientificFunction│   │ BusinessFormula │     │
//! │  │  ─────────────  │   │  ───────────────  │   │  ─────────────  │     │
//! │  │  Add      +     │   │  Sqrt             │   │  Tax      (+)   │     │
//! │  │  Subtract -     │   │  Sin  (degrees)   │   │  Discount (-)   │     │
//! │  │  Multiply *     │   │  Cos  (degrees)   │   │  Tip      (+)   │     │
//! │  │  Divide   /     │   │  Tan  (degrees)   │   │  Markup   (+)   │     │
//! │  │  Modulo   %     │   │  Log10            │   └────────┬────────┘     │
//! │  │  Power    ^     │   │  Ln               │            │              │
//! │  └─────────────────┘   └───────────────────┘   ┌────────▼────────┐     │
//! │                                                │  BusinessRates  │     │
//! │  ┌─────────────────┐                           │  tax / discount │     │
//! │  │     Digit       │                           │  tip / markup   │     │
//! │  │  0..=9 only     │                           └─────────────────┘     │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every tag is an enum, so an unknown operator is a parse error at the
//! boundary and an exhaustive `match` everywhere else.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::{CoreError, ValidationError};

// =============================================================================
// Digit
// =============================================================================

/// A single decimal digit, `0..=9`.
///
/// ## Example
/// ```rust
/// use tally_core::Digit;
///
/// let seven = Digit::try_from(7u8).unwrap();
/// assert_eq!(seven.as_char(), '7');
/// assert!(Digit::try_from(10u8).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Digit(u8);

impl Digit {
    /// Returns the digit value.
    #[inline]
    pub const fn value(&self) -> u8 {
        self.0
    }

    /// Returns the ASCII character for this digit.
    #[inline]
    pub const fn as_char(&self) -> char {
        (b'0' + self.0) as char
    }
}

impl TryFrom<u8> for Digit {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value <= 9 {
            Ok(Digit(value))
        } else {
            Err(ValidationError::InvalidDigit {
                value: value as u32,
            })
        }
    }
}

impl TryFrom<char> for Digit {
    type Error = ValidationError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        c.to_digit(10)
            .map(|d| Digit(d as u8))
            .ok_or(ValidationError::InvalidDigit { value: c as u32 })
    }
}

impl fmt::Display for Digit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Operation Kind
// =============================================================================

/// A binary operation waiting for its right-hand operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Power,
}

impl OperationKind {
    /// All operations, in keypad order.
    pub const ALL: [OperationKind; 6] = [
        OperationKind::Add,
        OperationKind::Subtract,
        OperationKind::Multiply,
        OperationKind::Divide,
        OperationKind::Modulo,
        OperationKind::Power,
    ];

    /// Symbol used in history expressions and the status line.
    pub const fn symbol(&self) -> &'static str {
        match self {
            OperationKind::Add => "+",
            OperationKind::Subtract => "-",
            OperationKind::Multiply => "*",
            OperationKind::Divide => "/",
            OperationKind::Modulo => "%",
            OperationKind::Power => "^",
        }
    }

    /// Evaluates `a <op> b`.
    ///
    /// ## Edge Case Policy
    /// ```text
    /// ┌──────────┬──────────────────────────────────────────────────────────┐
    /// │ Divide   │ b == 0 → 0. Not an error, not Infinity.                  │
    /// │ Modulo   │ IEEE remainder, sign of a. b == 0 → NaN, unguarded.      │
    /// │ Power    │ Real power. (-8) ^ 0.5 → NaN, unguarded.                 │
    /// └──────────┴──────────────────────────────────────────────────────────┘
    /// ```
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::OperationKind;
    ///
    /// assert_eq!(OperationKind::Divide.apply(7.0, 0.0), 0.0);
    /// assert_eq!(OperationKind::Modulo.apply(-7.0, 3.0), -1.0);
    /// assert!(OperationKind::Power.apply(-8.0, 0.5).is_nan());
    /// ```
    pub fn apply(&self, a: f64, b: f64) -> f64 {
        match self {
            OperationKind::Add => a + b,
            OperationKind::Subtract => a - b,
            OperationKind::Multiply => a * b,
            OperationKind::Divide => {
                if b == 0.0 {
                    0.0
                } else {
                    a / b
                }
            }
            OperationKind::Modulo => a % b,
            OperationKind::Power => a.powf(b),
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for OperationKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "+" | "add" | "plus" => Ok(OperationKind::Add),
            "-" | "subtract" | "minus" | "sub" => Ok(OperationKind::Subtract),
            "*" | "x" | "×" | "multiply" | "times" | "mul" => Ok(OperationKind::Multiply),
            "/" | "÷" | "divide" | "div" => Ok(OperationKind::Divide),
            "%" | "mod" | "modulo" => Ok(OperationKind::Modulo),
            "^" | "**" | "pow" | "power" => Ok(OperationKind::Power),
            other => Err(CoreError::UnknownOperation(other.to_string())),
        }
    }
}

// =============================================================================
// Scientific Function
// =============================================================================

/// A unary function applied directly to the display value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ScientificFunction {
    Sqrt,
    Sin,
    Cos,
    Tan,
    Log10,
    Ln,
}

impl ScientificFunction {
    /// All functions, in keypad order.
    pub const ALL: [ScientificFunction; 6] = [
        ScientificFunction::Sqrt,
        ScientificFunction::Sin,
        ScientificFunction::Cos,
        ScientificFunction::Tan,
        ScientificFunction::Log10,
        ScientificFunction::Ln,
    ];

    /// Name used in history expressions, e.g. `sin(30)`.
    pub const fn name(&self) -> &'static str {
        match self {
            ScientificFunction::Sqrt => "sqrt",
            ScientificFunction::Sin => "sin",
            ScientificFunction::Cos => "cos",
            ScientificFunction::Tan => "tan",
            ScientificFunction::Log10 => "log",
            ScientificFunction::Ln => "ln",
        }
    }

    /// Evaluates the function. Trig operands are in degrees.
    ///
    /// No domain guards: `sqrt(-1)` and `log(-1)` are NaN, `log(0)` and
    /// `ln(0)` are negative infinity.
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::ScientificFunction;
    ///
    /// assert_eq!(ScientificFunction::Sqrt.apply(81.0), 9.0);
    /// assert_eq!(ScientificFunction::Sin.apply(90.0), 1.0);
    /// assert_eq!(ScientificFunction::Log10.apply(0.0), f64::NEG_INFINITY);
    /// ```
    pub fn apply(&self, x: f64) -> f64 {
        match self {
            ScientificFunction::Sqrt => x.sqrt(),
            ScientificFunction::Sin => degrees_to_radians(x).sin(),
            ScientificFunction::Cos => degrees_to_radians(x).cos(),
            ScientificFunction::Tan => degrees_to_radians(x).tan(),
            ScientificFunction::Log10 => x.log10(),
            ScientificFunction::Ln => x.ln(),
        }
    }
}

fn degrees_to_radians(degrees: f64) -> f64 {
    degrees * PI / 180.0
}

impl fmt::Display for ScientificFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ScientificFunction {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sqrt" | "√" => Ok(ScientificFunction::Sqrt),
            "sin" => Ok(ScientificFunction::Sin),
            "cos" => Ok(ScientificFunction::Cos),
            "tan" => Ok(ScientificFunction::Tan),
            "log" | "log10" => Ok(ScientificFunction::Log10),
            "ln" => Ok(ScientificFunction::Ln),
            other => Err(CoreError::UnknownFunction(other.to_string())),
        }
    }
}

// =============================================================================
// Business Formula
// =============================================================================

/// A percentage-rate formula applied to the display amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum BusinessFormula {
    Tax,
    Discount,
    Tip,
    Markup,
}

impl BusinessFormula {
    /// All formulas, in keypad order.
    pub const ALL: [BusinessFormula; 4] = [
        BusinessFormula::Tax,
        BusinessFormula::Discount,
        BusinessFormula::Tip,
        BusinessFormula::Markup,
    ];

    /// Lowercase name used in history expressions.
    pub const fn name(&self) -> &'static str {
        match self {
            BusinessFormula::Tax => "tax",
            BusinessFormula::Discount => "discount",
            BusinessFormula::Tip => "tip",
            BusinessFormula::Markup => "markup",
        }
    }

    /// Whether the delta is subtracted from the amount.
    #[inline]
    pub const fn is_reduction(&self) -> bool {
        matches!(self, BusinessFormula::Discount)
    }

    /// Computes the formula for `amount` at `rate` percent.
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::BusinessFormula;
    ///
    /// let b = BusinessFormula::Discount.compute(200.0, 10.0);
    /// assert_eq!(b.delta, 20.0);
    /// assert_eq!(b.total, 180.0);
    /// ```
    pub fn compute(&self, amount: f64, rate: f64) -> FormulaBreakdown {
        let delta = amount * rate / 100.0;
        let total = if self.is_reduction() {
            amount - delta
        } else {
            amount + delta
        };

        FormulaBreakdown {
            formula: *self,
            amount,
            rate,
            delta,
            total,
        }
    }
}

impl fmt::Display for BusinessFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BusinessFormula {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tax" => Ok(BusinessFormula::Tax),
            "discount" | "disc" => Ok(BusinessFormula::Discount),
            "tip" => Ok(BusinessFormula::Tip),
            "markup" => Ok(BusinessFormula::Markup),
            other => Err(CoreError::UnknownFormula(other.to_string())),
        }
    }
}

/// Result of one business-formula evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct FormulaBreakdown {
    pub formula: BusinessFormula,
    /// Amount read from the display.
    pub amount: f64,
    /// Rate in percent.
    pub rate: f64,
    /// `amount × rate / 100`, unrounded.
    pub delta: f64,
    /// Amount with the delta applied, unrounded.
    pub total: f64,
}

// =============================================================================
// Business Rates
// =============================================================================

/// Percentage rates for the business formulas.
///
/// Owned by the caller and passed into every formula call; the engine keeps
/// no copy. `8.25` means 8.25%.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BusinessRates {
    pub tax_rate: f64,
    pub discount_rate: f64,
    pub tip_rate: f64,
    pub markup_rate: f64,
}

impl BusinessRates {
    /// Returns the rate a formula reads.
    pub const fn rate_for(&self, formula: BusinessFormula) -> f64 {
        match formula {
            BusinessFormula::Tax => self.tax_rate,
            BusinessFormula::Discount => self.discount_rate,
            BusinessFormula::Tip => self.tip_rate,
            BusinessFormula::Markup => self.markup_rate,
        }
    }

    /// Replaces the rate a formula reads.
    pub fn set_rate(&mut self, formula: BusinessFormula, rate: f64) {
        match formula {
            BusinessFormula::Tax => self.tax_rate = rate,
            BusinessFormula::Discount => self.discount_rate = rate,
            BusinessFormula::Tip => self.tip_rate = rate,
            BusinessFormula::Markup => self.markup_rate = rate,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digit_bounds() {
        assert_eq!(Digit::try_from(0u8).unwrap().value(), 0);
        assert_eq!(Digit::try_from(9u8).unwrap().as_char(), '9');
        assert_eq!(
            Digit::try_from(10u8),
            Err(ValidationError::InvalidDigit { value: 10 })
        );
        assert_eq!(Digit::try_from('4').unwrap().value(), 4);
        assert!(Digit::try_from('a').is_err());
    }

    #[test]
    fn test_binary_operations() {
        assert_eq!(OperationKind::Add.apply(2.0, 3.0), 5.0);
        assert_eq!(OperationKind::Subtract.apply(2.0, 3.0), -1.0);
        assert_eq!(OperationKind::Multiply.apply(2.5, 4.0), 10.0);
        assert_eq!(OperationKind::Divide.apply(9.0, 4.0), 2.25);
        assert_eq!(OperationKind::Modulo.apply(10.0, 4.0), 2.0);
        assert_eq!(OperationKind::Power.apply(2.0, 10.0), 1024.0);
        assert_eq!(OperationKind::Power.apply(2.0, -1.0), 0.5);
    }

    #[test]
    fn test_divide_by_zero_is_zero() {
        assert_eq!(OperationKind::Divide.apply(5.0, 0.0), 0.0);
        assert_eq!(OperationKind::Divide.apply(-5.0, -0.0), 0.0);
        assert_eq!(OperationKind::Divide.apply(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_modulo_by_zero_is_nan() {
        assert!(OperationKind::Modulo.apply(5.0, 0.0).is_nan());
    }

    #[test]
    fn test_operation_parsing() {
        assert_eq!("+".parse::<OperationKind>().unwrap(), OperationKind::Add);
        assert_eq!("×".parse::<OperationKind>().unwrap(), OperationKind::Multiply);
        assert_eq!("MOD".parse::<OperationKind>().unwrap(), OperationKind::Modulo);
        assert!(matches!(
            "&".parse::<OperationKind>(),
            Err(CoreError::UnknownOperation(_))
        ));

        for op in OperationKind::ALL {
            assert_eq!(op.symbol().parse::<OperationKind>().unwrap(), op);
        }
    }

    #[test]
    fn test_trig_uses_degrees() {
        assert!((ScientificFunction::Sin.apply(30.0) - 0.5).abs() < 1e-12);
        assert!((ScientificFunction::Cos.apply(60.0) - 0.5).abs() < 1e-12);
        assert!((ScientificFunction::Tan.apply(45.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_logarithms_unguarded() {
        assert!((ScientificFunction::Log10.apply(1000.0) - 3.0).abs() < 1e-12);
        assert_eq!(ScientificFunction::Ln.apply(1.0), 0.0);
        assert!(ScientificFunction::Log10.apply(-1.0).is_nan());
        assert_eq!(ScientificFunction::Ln.apply(0.0), f64::NEG_INFINITY);
        assert!(ScientificFunction::Sqrt.apply(-4.0).is_nan());
    }

    #[test]
    fn test_function_parsing() {
        for f in ScientificFunction::ALL {
            assert_eq!(f.name().parse::<ScientificFunction>().unwrap(), f);
        }
        assert_eq!(
            "log10".parse::<ScientificFunction>().unwrap(),
            ScientificFunction::Log10
        );
        assert!("sinh".parse::<ScientificFunction>().is_err());
    }

    #[test]
    fn test_formula_compute() {
        let tax = BusinessFormula::Tax.compute(100.0, 8.25);
        assert!((tax.delta - 8.25).abs() < 1e-9);
        assert!((tax.total - 108.25).abs() < 1e-9);

        let markup = BusinessFormula::Markup.compute(80.0, 25.0);
        assert_eq!(markup.delta, 20.0);
        assert_eq!(markup.total, 100.0);

        let tip = BusinessFormula::Tip.compute(40.0, 15.0);
        assert_eq!(tip.total, 46.0);
    }

    #[test]
    fn test_rates_lookup() {
        let mut rates = BusinessRates {
            tax_rate: 8.25,
            discount_rate: 10.0,
            tip_rate: 15.0,
            markup_rate: 25.0,
        };
        assert_eq!(rates.rate_for(BusinessFormula::Tip), 15.0);

        rates.set_rate(BusinessFormula::Tip, 20.0);
        assert_eq!(rates.rate_for(BusinessFormula::Tip), 20.0);
        assert_eq!(rates.rate_for(BusinessFormula::Tax), 8.25);
    }

    #[test]
    fn test_rates_serialize_camel_case() {
        let rates = BusinessRates {
            tax_rate: 8.25,
            ..Default::default()
        };
        let json = serde_json::to_value(rates).unwrap();
        assert_eq!(json["taxRate"], 8.25);
        assert_eq!(json["markupRate"], 0.0);
    }
}
