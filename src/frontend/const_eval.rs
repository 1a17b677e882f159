//! Constant folding for exported constants.
//!
//! The evaluator accepts literals, unary operators, binary operators and parentheses. Anything
//! else (paths, calls, casts, blocks, ...) is rejected: a builtin constant must be computable
//! from its own initializer.
//!
//! ## Value model
//! - Integers are `i128` with checked arithmetic.
//! - Floats are exact `i128` rationals; an operation that overflows the rational falls back to an
//!   `f64` approximation.
//! - Char literals fold to one-character strings, byte literals to integers, byte strings to
//!   [`ConstValue::Bytes`] (which the registry cannot represent).
//! - With a declared integer type ([`IntWidth`]), `!` flips bits at that width and the final value
//!   must fit the type. A literal suffix (`!0u8`) takes precedence over the declared type.
//!
//! ## Examples
//! ```rust
//! use cuegen::frontend::const_eval::{fold, normalize};
//!
//! let expr: syn::Expr = syn::parse_str("(1 << 4) + 2").unwrap();
//! let value = normalize(fold(&expr).unwrap()).unwrap();
//! assert_eq!(value.text(), "18");
//! ```

use std::cmp::Ordering;

use cuegen_core::numbers::format_general;
use cuegen_core::strings::quote_cue;
use quote::ToTokens;
use syn::{BinOp, Expr, Lit, UnOp};
use thiserror::Error;

/// Errors raised while folding a constant initializer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConstEvalError {
    #[error("unsupported expression kind `{0}`")]
    UnsupportedExpr(&'static str),

    #[error("unsupported literal `{0}`")]
    UnsupportedLiteral(String),

    #[error("invalid operation: {lhs} {op} {rhs}")]
    InvalidBinary {
        op: &'static str,
        lhs: &'static str,
        rhs: &'static str,
    },

    #[error("invalid operation: {op}{operand}")]
    InvalidUnary { op: &'static str, operand: &'static str },

    #[error("integer overflow in `{op}`")]
    Overflow { op: &'static str },

    #[error("division by zero")]
    DivisionByZero,
}

/// Folded float value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Float {
    /// Reduced fraction with a positive denominator.
    Exact { num: i128, den: i128 },
    Approx(f64),
}

impl Float {
    pub fn from_int(value: i128) -> Self {
        Float::Exact { num: value, den: 1 }
    }

    /// Build a reduced fraction; `den` must be non-zero.
    fn ratio(num: i128, den: i128) -> Self {
        let (num, den) = if den < 0 {
            match (num.checked_neg(), den.checked_neg()) {
                (Some(n), Some(d)) => (n, d),
                _ => return Float::Approx(num as f64 / den as f64),
            }
        } else {
            (num, den)
        };
        if num == 0 {
            return Float::Exact { num: 0, den: 1 };
        }
        let g = gcd(num.unsigned_abs(), den.unsigned_abs()) as i128;
        Float::Exact {
            num: num / g,
            den: den / g,
        }
    }

    pub fn to_f64(self) -> f64 {
        match self {
            Float::Exact { num, den } => num as f64 / den as f64,
            Float::Approx(v) => v,
        }
    }

    fn is_zero(self) -> bool {
        match self {
            Float::Exact { num, .. } => num == 0,
            Float::Approx(v) => v == 0.0,
        }
    }

    fn combine(
        self,
        other: Float,
        exact: impl Fn(i128, i128, i128, i128) -> Option<(i128, i128)>,
        approx: impl Fn(f64, f64) -> f64,
    ) -> Float {
        if let (Float::Exact { num: an, den: ad }, Float::Exact { num: bn, den: bd }) = (self, other) {
            if let Some((num, den)) = exact(an, ad, bn, bd) {
                return Float::ratio(num, den);
            }
        }
        Float::Approx(approx(self.to_f64(), other.to_f64()))
    }

    fn add(self, other: Float) -> Float {
        self.combine(
            other,
            |an, ad, bn, bd| Some((an.checked_mul(bd)?.checked_add(bn.checked_mul(ad)?)?, ad.checked_mul(bd)?)),
            |a, b| a + b,
        )
    }

    fn sub(self, other: Float) -> Float {
        self.combine(
            other,
            |an, ad, bn, bd| Some((an.checked_mul(bd)?.checked_sub(bn.checked_mul(ad)?)?, ad.checked_mul(bd)?)),
            |a, b| a - b,
        )
    }

    fn mul(self, other: Float) -> Float {
        self.combine(
            other,
            |an, ad, bn, bd| Some((an.checked_mul(bn)?, ad.checked_mul(bd)?)),
            |a, b| a * b,
        )
    }

    /// Divide; `other` must be non-zero.
    fn div(self, other: Float) -> Float {
        self.combine(
            other,
            |an, ad, bn, bd| Some((an.checked_mul(bd)?, ad.checked_mul(bn)?)),
            |a, b| a / b,
        )
    }

    fn neg(self) -> Float {
        match self {
            Float::Exact { num, den } => match num.checked_neg() {
                Some(num) => Float::Exact { num, den },
                None => Float::Approx(-self.to_f64()),
            },
            Float::Approx(v) => Float::Approx(-v),
        }
    }

    fn compare(self, other: Float) -> Option<Ordering> {
        if let (Float::Exact { num: an, den: ad }, Float::Exact { num: bn, den: bd }) = (self, other) {
            if let (Some(l), Some(r)) = (an.checked_mul(bd), bn.checked_mul(ad)) {
                return Some(l.cmp(&r));
            }
        }
        self.to_f64().partial_cmp(&other.to_f64())
    }
}

fn gcd(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// A folded constant.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstValue {
    Bool(bool),
    Int(i128),
    Float(Float),
    Str(String),
    Bytes(Vec<u8>),
}

impl ConstValue {
    /// Kind spelling used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            ConstValue::Bool(_) => "bool",
            ConstValue::Int(_) => "int",
            ConstValue::Float(_) => "float",
            ConstValue::Str(_) => "string",
            ConstValue::Bytes(_) => "bytes",
        }
    }
}

/// A constant in the form stored in the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizedValue {
    Bool(bool),
    Int(String),
    Float(String),
    /// Quoted CUE string literal.
    String(String),
}

impl NormalizedValue {
    /// Registry text of the value.
    pub fn text(&self) -> &str {
        match self {
            NormalizedValue::Bool(true) => "true",
            NormalizedValue::Bool(false) => "false",
            NormalizedValue::Int(t) | NormalizedValue::Float(t) | NormalizedValue::String(t) => t,
        }
    }
}

/// A folded value the registry cannot hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unrepresentable {
    pub kind: &'static str,
    pub value: String,
}

/// Convert a folded value into registry form.
pub fn normalize(value: ConstValue) -> Result<NormalizedValue, Unrepresentable> {
    match value {
        ConstValue::Bool(b) => Ok(NormalizedValue::Bool(b)),
        ConstValue::Int(i) => Ok(NormalizedValue::Int(i.to_string())),
        ConstValue::Float(f) => Ok(NormalizedValue::Float(format_general(f.to_f64()))),
        ConstValue::Str(s) => Ok(NormalizedValue::String(quote_cue(&s))),
        ConstValue::Bytes(b) => Err(Unrepresentable {
            kind: "bytes",
            value: format!("b\"{}\"", b.escape_ascii()),
        }),
    }
}

/// Fixed-width integer type of a constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntWidth {
    pub name: &'static str,
    pub bits: u32,
    pub signed: bool,
}

const INT_WIDTHS: &[IntWidth] = &[
    IntWidth { name: "i8", bits: 8, signed: true },
    IntWidth { name: "i16", bits: 16, signed: true },
    IntWidth { name: "i32", bits: 32, signed: true },
    IntWidth { name: "i64", bits: 64, signed: true },
    IntWidth { name: "i128", bits: 128, signed: true },
    IntWidth { name: "isize", bits: 64, signed: true },
    IntWidth { name: "u8", bits: 8, signed: false },
    IntWidth { name: "u16", bits: 16, signed: false },
    IntWidth { name: "u32", bits: 32, signed: false },
    IntWidth { name: "u64", bits: 64, signed: false },
    IntWidth { name: "u128", bits: 128, signed: false },
    IntWidth { name: "usize", bits: 64, signed: false },
];

impl IntWidth {
    /// Width of a primitive integer type name or literal suffix.
    pub fn from_name(name: &str) -> Option<Self> {
        INT_WIDTHS.iter().copied().find(|w| w.name == name)
    }

    /// Width of a declared constant type, if it is a primitive integer.
    pub fn of_type(ty: &syn::Type) -> Option<Self> {
        match ty {
            syn::Type::Path(p) if p.qself.is_none() => p
                .path
                .get_ident()
                .and_then(|ident| Self::from_name(&ident.to_string())),
            syn::Type::Paren(p) => Self::of_type(&p.elem),
            syn::Type::Group(g) => Self::of_type(&g.elem),
            _ => None,
        }
    }

    fn min(self) -> i128 {
        match (self.signed, self.bits) {
            (false, _) => 0,
            (true, 128) => i128::MIN,
            (true, bits) => -(1i128 << (bits - 1)),
        }
    }

    fn max(self) -> i128 {
        match (self.signed, self.bits) {
            (_, 128) => i128::MAX,
            (true, bits) => (1i128 << (bits - 1)) - 1,
            (false, bits) => (1i128 << bits) - 1,
        }
    }

    fn contains(self, value: i128) -> bool {
        (self.min()..=self.max()).contains(&value)
    }

    /// Bitwise complement at this width.
    fn not(self, value: i128) -> Result<i128, ConstEvalError> {
        let overflow = ConstEvalError::Overflow { op: "!" };
        if !self.contains(value) {
            return Err(overflow);
        }
        if self.signed {
            return Ok(!value);
        }
        let mask = if self.bits == 128 { u128::MAX } else { (1u128 << self.bits) - 1 };
        i128::try_from(!(value as u128) & mask).map_err(|_| overflow)
    }
}

/// Fold a constant initializer without a declared type.
pub fn fold(expr: &Expr) -> Result<ConstValue, ConstEvalError> {
    fold_with(expr, None)
}

/// Fold a constant initializer declared with `width`, range-checking an integer result.
pub fn fold_as(expr: &Expr, width: Option<IntWidth>) -> Result<ConstValue, ConstEvalError> {
    let value = fold_with(expr, width)?;
    match (width, &value) {
        (Some(w), ConstValue::Int(i)) if !w.contains(*i) => Err(ConstEvalError::Overflow { op: w.name }),
        _ => Ok(value),
    }
}

fn fold_with(expr: &Expr, width: Option<IntWidth>) -> Result<ConstValue, ConstEvalError> {
    match expr {
        Expr::Lit(lit) => fold_lit(&lit.lit),
        Expr::Paren(p) => fold_with(&p.expr, width),
        Expr::Group(g) => fold_with(&g.expr, width),
        Expr::Unary(u) => {
            let width = suffix_width(&u.expr).or(width);
            fold_unary(&u.op, fold_with(&u.expr, width)?, width)
        }
        Expr::Binary(b) => {
            let op = BinaryOp::from_syn(&b.op)?;
            fold_binary(op, fold_with(&b.left, width)?, fold_with(&b.right, width)?)
        }
        other => Err(ConstEvalError::UnsupportedExpr(expr_kind(other))),
    }
}

/// Width named by an integer literal suffix (`0u8`), looking through parentheses.
fn suffix_width(expr: &Expr) -> Option<IntWidth> {
    match expr {
        Expr::Lit(syn::ExprLit { lit: Lit::Int(i), .. }) => IntWidth::from_name(i.suffix()),
        Expr::Paren(p) => suffix_width(&p.expr),
        Expr::Group(g) => suffix_width(&g.expr),
        _ => None,
    }
}

fn fold_lit(lit: &Lit) -> Result<ConstValue, ConstEvalError> {
    match lit {
        Lit::Int(i) if matches!(i.suffix(), "f32" | "f64") => {
            Ok(ConstValue::Float(parse_float_literal(i.base10_digits())?))
        }
        Lit::Int(i) => i
            .base10_parse::<i128>()
            .map(ConstValue::Int)
            .map_err(|_| ConstEvalError::Overflow { op: "literal" }),
        Lit::Float(f) => Ok(ConstValue::Float(parse_float_literal(f.base10_digits())?)),
        Lit::Str(s) => Ok(ConstValue::Str(s.value())),
        Lit::Char(c) => Ok(ConstValue::Str(c.value().to_string())),
        Lit::Byte(b) => Ok(ConstValue::Int(i128::from(b.value()))),
        Lit::ByteStr(b) => Ok(ConstValue::Bytes(b.value())),
        Lit::CStr(c) => Ok(ConstValue::Bytes(c.value().into_bytes())),
        Lit::Bool(b) => Ok(ConstValue::Bool(b.value)),
        other => Err(ConstEvalError::UnsupportedLiteral(other.to_token_stream().to_string())),
    }
}

fn parse_float_literal(digits: &str) -> Result<Float, ConstEvalError> {
    let approx = digits
        .parse::<f64>()
        .map_err(|_| ConstEvalError::UnsupportedLiteral(digits.to_string()))?;
    Ok(exact_decimal(digits).unwrap_or(Float::Approx(approx)))
}

/// Parse decimal float text exactly, or `None` if it does not fit an `i128` fraction.
fn exact_decimal(digits: &str) -> Option<Float> {
    let (mantissa, exp) = match digits.find(['e', 'E']) {
        Some(i) => (&digits[..i], digits[i + 1..].parse::<i32>().ok()?),
        None => (digits, 0),
    };
    let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let mut num: i128 = 0;
    for c in int_part.chars().chain(frac_part.chars()) {
        let d = c.to_digit(10)?;
        num = num.checked_mul(10)?.checked_add(i128::from(d))?;
    }
    let scale = exp.checked_sub(i32::try_from(frac_part.len()).ok()?)?;
    let pow = 10i128.checked_pow(scale.unsigned_abs())?;
    if scale >= 0 {
        Some(Float::ratio(num.checked_mul(pow)?, 1))
    } else {
        Some(Float::ratio(num, pow))
    }
}

fn fold_unary(op: &UnOp, value: ConstValue, width: Option<IntWidth>) -> Result<ConstValue, ConstEvalError> {
    match (op, value) {
        (UnOp::Neg(_), ConstValue::Int(i)) => i
            .checked_neg()
            .map(ConstValue::Int)
            .ok_or(ConstEvalError::Overflow { op: "-" }),
        (UnOp::Neg(_), ConstValue::Float(f)) => Ok(ConstValue::Float(f.neg())),
        (UnOp::Not(_), ConstValue::Bool(b)) => Ok(ConstValue::Bool(!b)),
        (UnOp::Not(_), ConstValue::Int(i)) => match width {
            Some(w) => w.not(i).map(ConstValue::Int),
            None => Ok(ConstValue::Int(!i)),
        },
        (UnOp::Neg(_), other) => Err(ConstEvalError::InvalidUnary {
            op: "-",
            operand: other.kind_name(),
        }),
        (UnOp::Not(_), other) => Err(ConstEvalError::InvalidUnary {
            op: "!",
            operand: other.kind_name(),
        }),
        (UnOp::Deref(_), _) => Err(ConstEvalError::UnsupportedExpr("dereference")),
        _ => Err(ConstEvalError::UnsupportedExpr("unary operator")),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    And,
    Or,
    BitXor,
    BitAnd,
    BitOr,
    Shl,
    Shr,
    Eq,
    Lt,
    Le,
    Ne,
    Ge,
    Gt,
}

impl BinaryOp {
    fn from_syn(op: &BinOp) -> Result<Self, ConstEvalError> {
        Ok(match op {
            BinOp::Add(_) => BinaryOp::Add,
            BinOp::Sub(_) => BinaryOp::Sub,
            BinOp::Mul(_) => BinaryOp::Mul,
            BinOp::Div(_) => BinaryOp::Div,
            BinOp::Rem(_) => BinaryOp::Rem,
            BinOp::And(_) => BinaryOp::And,
            BinOp::Or(_) => BinaryOp::Or,
            BinOp::BitXor(_) => BinaryOp::BitXor,
            BinOp::BitAnd(_) => BinaryOp::BitAnd,
            BinOp::BitOr(_) => BinaryOp::BitOr,
            BinOp::Shl(_) => BinaryOp::Shl,
            BinOp::Shr(_) => BinaryOp::Shr,
            BinOp::Eq(_) => BinaryOp::Eq,
            BinOp::Lt(_) => BinaryOp::Lt,
            BinOp::Le(_) => BinaryOp::Le,
            BinOp::Ne(_) => BinaryOp::Ne,
            BinOp::Ge(_) => BinaryOp::Ge,
            BinOp::Gt(_) => BinaryOp::Gt,
            _ => return Err(ConstEvalError::UnsupportedExpr("compound assignment")),
        })
    }

    fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            BinaryOp::BitXor => "^",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitOr => "|",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::Eq => "==",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Ne => "!=",
            BinaryOp::Ge => ">=",
            BinaryOp::Gt => ">",
        }
    }

    /// Evaluate a comparison, or `None` if this is not a comparison operator.
    fn compare(self, ord: Option<Ordering>) -> Option<bool> {
        let result = match self {
            BinaryOp::Eq => ord == Some(Ordering::Equal),
            BinaryOp::Ne => ord != Some(Ordering::Equal),
            BinaryOp::Lt => ord == Some(Ordering::Less),
            BinaryOp::Le => matches!(ord, Some(Ordering::Less | Ordering::Equal)),
            BinaryOp::Gt => ord == Some(Ordering::Greater),
            BinaryOp::Ge => matches!(ord, Some(Ordering::Greater | Ordering::Equal)),
            _ => return None,
        };
        Some(result)
    }

    fn overflow(self) -> ConstEvalError {
        ConstEvalError::Overflow { op: self.symbol() }
    }
}

fn fold_binary(op: BinaryOp, lhs: ConstValue, rhs: ConstValue) -> Result<ConstValue, ConstEvalError> {
    let (lhs_kind, rhs_kind) = (lhs.kind_name(), rhs.kind_name());
    let folded = match (lhs, rhs) {
        (ConstValue::Int(a), ConstValue::Int(b)) => int_op(op, a, b)?,
        (ConstValue::Float(a), ConstValue::Float(b)) => float_op(op, a, b)?,
        (ConstValue::Int(a), ConstValue::Float(b)) => float_op(op, Float::from_int(a), b)?,
        (ConstValue::Float(a), ConstValue::Int(b)) => float_op(op, a, Float::from_int(b))?,
        (ConstValue::Bool(a), ConstValue::Bool(b)) => bool_op(op, a, b),
        (ConstValue::Str(a), ConstValue::Str(b)) => str_op(op, a, b),
        _ => None,
    };
    folded.ok_or(ConstEvalError::InvalidBinary {
        op: op.symbol(),
        lhs: lhs_kind,
        rhs: rhs_kind,
    })
}

fn int_op(op: BinaryOp, a: i128, b: i128) -> Result<Option<ConstValue>, ConstEvalError> {
    if let Some(result) = op.compare(Some(a.cmp(&b))) {
        return Ok(Some(ConstValue::Bool(result)));
    }
    let value = match op {
        BinaryOp::Add => a.checked_add(b).ok_or(op.overflow())?,
        BinaryOp::Sub => a.checked_sub(b).ok_or(op.overflow())?,
        BinaryOp::Mul => a.checked_mul(b).ok_or(op.overflow())?,
        BinaryOp::Div | BinaryOp::Rem if b == 0 => return Err(ConstEvalError::DivisionByZero),
        BinaryOp::Div => a.checked_div(b).ok_or(op.overflow())?,
        BinaryOp::Rem => a.checked_rem(b).ok_or(op.overflow())?,
        BinaryOp::BitAnd => a & b,
        BinaryOp::BitOr => a | b,
        BinaryOp::BitXor => a ^ b,
        BinaryOp::Shl => {
            let shift = shift_amount(op, b)?;
            let shifted = a.checked_shl(shift).ok_or(op.overflow())?;
            if shifted >> shift != a {
                return Err(op.overflow());
            }
            shifted
        }
        BinaryOp::Shr => {
            let shift = shift_amount(op, b)?;
            a.checked_shr(shift).ok_or(op.overflow())?
        }
        _ => return Ok(None),
    };
    Ok(Some(ConstValue::Int(value)))
}

fn shift_amount(op: BinaryOp, b: i128) -> Result<u32, ConstEvalError> {
    u32::try_from(b)
        .ok()
        .filter(|s| *s < i128::BITS)
        .ok_or(op.overflow())
}

fn float_op(op: BinaryOp, a: Float, b: Float) -> Result<Option<ConstValue>, ConstEvalError> {
    if let Some(result) = op.compare(a.compare(b)) {
        return Ok(Some(ConstValue::Bool(result)));
    }
    let value = match op {
        BinaryOp::Add => a.add(b),
        BinaryOp::Sub => a.sub(b),
        BinaryOp::Mul => a.mul(b),
        BinaryOp::Div if b.is_zero() => return Err(ConstEvalError::DivisionByZero),
        BinaryOp::Div => a.div(b),
        _ => return Ok(None),
    };
    Ok(Some(ConstValue::Float(value)))
}

fn bool_op(op: BinaryOp, a: bool, b: bool) -> Option<ConstValue> {
    let value = match op {
        BinaryOp::And | BinaryOp::BitAnd => a && b,
        BinaryOp::Or | BinaryOp::BitOr => a || b,
        BinaryOp::BitXor | BinaryOp::Ne => a != b,
        BinaryOp::Eq => a == b,
        _ => return None,
    };
    Some(ConstValue::Bool(value))
}

fn str_op(op: BinaryOp, a: String, b: String) -> Option<ConstValue> {
    if let Some(result) = op.compare(Some(a.cmp(&b))) {
        return Some(ConstValue::Bool(result));
    }
    match op {
        BinaryOp::Add => Some(ConstValue::Str(a + &b)),
        _ => None,
    }
}

/// Short name of an expression node, for error messages.
fn expr_kind(expr: &Expr) -> &'static str {
    match expr {
        Expr::Array(_) => "array",
        Expr::Assign(_) => "assignment",
        Expr::Block(_) => "block",
        Expr::Call(_) => "call",
        Expr::Cast(_) => "cast",
        Expr::Closure(_) => "closure",
        Expr::Const(_) => "const block",
        Expr::Field(_) => "field access",
        Expr::If(_) => "if",
        Expr::Index(_) => "index",
        Expr::Macro(_) => "macro",
        Expr::Match(_) => "match",
        Expr::MethodCall(_) => "method call",
        Expr::Path(_) => "path",
        Expr::Range(_) => "range",
        Expr::Reference(_) => "reference",
        Expr::Repeat(_) => "array repeat",
        Expr::Struct(_) => "struct literal",
        Expr::Tuple(_) => "tuple",
        Expr::Unsafe(_) => "unsafe block",
        _ => "expression",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(src: &str) -> Result<ConstValue, ConstEvalError> {
        let expr: Expr = syn::parse_str(src).unwrap();
        fold(&expr)
    }

    fn text(src: &str) -> String {
        normalize(eval(src).unwrap()).unwrap().text().to_string()
    }

    #[test]
    fn test_integer_arithmetic() {
        assert_eq!(text("3"), "3");
        assert_eq!(text("0x10 + 0b1"), "17");
        assert_eq!(text("-(7 / 2)"), "-3");
        assert_eq!(text("7 % 4"), "3");
        assert_eq!(text("1_000 * 1_000"), "1000000");
        assert_eq!(text("1u64 << 62"), "4611686018427387904");
        assert_eq!(text("!0i32"), "-1");
    }

    #[test]
    fn test_float_folding_is_exact() {
        assert_eq!(text("3.14"), "3.14");
        assert_eq!(text("0.1 + 0.2"), "0.3");
        assert_eq!(text("1.0 / 3.0"), "0.3333333333333333");
        assert_eq!(text("2.0"), "2");
        assert_eq!(text("1e6"), "1e+06");
        assert_eq!(text("1 + 0.5"), "1.5");
        assert_eq!(text("2f64"), "2");
    }

    #[test]
    fn test_strings_and_bools() {
        assert_eq!(text(r#""a" + "b""#), "\"ab\"");
        assert_eq!(text("'x'"), "\"x\"");
        assert_eq!(text("b'a'"), "97");
        assert_eq!(text("true && !false"), "true");
        assert_eq!(text("2 < 3"), "true");
        assert_eq!(text("\"a\" == \"b\""), "false");
    }

    #[test]
    fn test_byte_strings_are_unrepresentable() {
        let err = normalize(eval(r#"b"hi""#).unwrap()).unwrap_err();
        assert_eq!(err.kind, "bytes");
        assert_eq!(err.value, "b\"hi\"");
    }

    #[test]
    fn test_fatal_errors() {
        assert_eq!(eval("1 / 0"), Err(ConstEvalError::DivisionByZero));
        assert_eq!(eval("1.0 / 0.0"), Err(ConstEvalError::DivisionByZero));
        assert_eq!(eval("OTHER + 1"), Err(ConstEvalError::UnsupportedExpr("path")));
        assert_eq!(eval("f(1)"), Err(ConstEvalError::UnsupportedExpr("call")));
        assert_eq!(eval("1 as f64"), Err(ConstEvalError::UnsupportedExpr("cast")));
        assert_eq!(
            eval("\"a\" - \"b\""),
            Err(ConstEvalError::InvalidBinary {
                op: "-",
                lhs: "string",
                rhs: "string",
            })
        );
        assert_eq!(
            eval("170141183460469231731687303715884105727 + 1"),
            Err(ConstEvalError::Overflow { op: "+" })
        );
        assert_eq!(eval("1 << 127"), Err(ConstEvalError::Overflow { op: "<<" }));
        assert_eq!(
            eval("-true"),
            Err(ConstEvalError::InvalidUnary {
                op: "-",
                operand: "bool",
            })
        );
    }

    fn typed(src: &str, ty: &str) -> Result<ConstValue, ConstEvalError> {
        let expr: Expr = syn::parse_str(src).unwrap();
        let ty: syn::Type = syn::parse_str(ty).unwrap();
        fold_as(&expr, IntWidth::of_type(&ty))
    }

    #[test]
    fn test_complement_follows_declared_width() {
        assert_eq!(typed("!0", "u32"), Ok(ConstValue::Int(4_294_967_295)));
        assert_eq!(typed("!0", "u8"), Ok(ConstValue::Int(255)));
        assert_eq!(typed("!0x0f", "u8"), Ok(ConstValue::Int(240)));
        assert_eq!(typed("!0", "i32"), Ok(ConstValue::Int(-1)));
        assert_eq!(typed("!0", "u64"), Ok(ConstValue::Int(18_446_744_073_709_551_615)));
        assert_eq!(typed("!0", "u128"), Err(ConstEvalError::Overflow { op: "!" }));
        assert_eq!(typed("!0u8", "u32"), Ok(ConstValue::Int(255)));
        assert_eq!(typed("(!0) >> 4", "u16"), Ok(ConstValue::Int(4095)));
    }

    #[test]
    fn test_declared_width_is_range_checked() {
        assert_eq!(typed("255 + 1", "u8"), Err(ConstEvalError::Overflow { op: "u8" }));
        assert_eq!(typed("-1", "usize"), Err(ConstEvalError::Overflow { op: "usize" }));
        assert_eq!(typed("-128", "i8"), Ok(ConstValue::Int(-128)));
        assert_eq!(typed("1.5", "f64"), Ok(ConstValue::Float(Float::ratio(3, 2))));
        assert_eq!(typed("!0", "MyAlias"), Ok(ConstValue::Int(-1)));
    }

    #[test]
    fn test_rational_overflow_degrades_to_approximation() {
        let value = eval("1e30 * 1e30").unwrap();
        assert!(matches!(value, ConstValue::Float(Float::Approx(_))));
        assert_eq!(normalize(value).unwrap().text(), "1e+60");
    }
}
