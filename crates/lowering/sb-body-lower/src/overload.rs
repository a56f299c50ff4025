//! Overload selection for method calls and object construction

use sb_diagnostics::{CompileError, Diagnostic};
use sb_model::{
    Expression, ExpressionKind, IntrinsicType, LiteralValue, ScriptModel, SymbolId, SymbolKind,
};
use sb_span::FileSpan;

/// Pick the candidate best matching the arguments
///
/// Candidates with the wrong arity are discarded. Among the rest, the
/// first whose parameters accept every argument wins; failing that, the
/// first candidate of the right arity is used.
pub fn select_overload(
    model: &ScriptModel,
    candidates: &[SymbolId],
    arguments: &[Expression],
    name: &str,
    location: FileSpan,
) -> Result<SymbolId, Diagnostic> {
    let by_arity: Vec<SymbolId> = candidates
        .iter()
        .copied()
        .filter(|candidate| model.parameters(*candidate).len() == arguments.len())
        .collect();

    let Some(&first) = by_arity.first() else {
        return Err(Diagnostic::at(
            CompileError::NoMatchingOverload {
                name: name.to_string(),
                arity: arguments.len(),
            },
            location,
        ));
    };
    if by_arity.len() == 1 {
        return Ok(first);
    }

    let selected = by_arity
        .iter()
        .copied()
        .find(|candidate| {
            model
                .parameters(*candidate)
                .iter()
                .zip(arguments)
                .all(|(parameter, argument)| {
                    let expected = match &model.symbol(*parameter).kind {
                        SymbolKind::Parameter(data) => data.ty,
                        _ => None,
                    };
                    accepts(model, expected, argument)
                })
        })
        .unwrap_or(first);
    tracing::trace!(name, candidates = by_arity.len(), "overload selected");
    Ok(selected)
}

/// Whether an argument converts implicitly to a parameter type
fn accepts(model: &ScriptModel, expected: Option<SymbolId>, argument: &Expression) -> bool {
    let Some(expected) = expected else {
        return true;
    };
    if matches!(argument.kind, ExpressionKind::Literal(LiteralValue::Null)) {
        return model.is_reference_type(expected);
    }
    let Some(actual) = argument.ty else {
        return model.is_reference_type(expected);
    };
    if model.is_assignable(actual, expected) {
        return true;
    }
    match (model.intrinsic_kind(actual), model.intrinsic_kind(expected)) {
        (Some(from), Some(to)) => widens(from, to),
        _ => false,
    }
}

/// Implicit numeric conversion from `from` to `to`
fn widens(from: IntrinsicType, to: IntrinsicType) -> bool {
    numeric_rank(from)
        .zip(numeric_rank(to))
        .is_some_and(|(from, to)| from <= to)
}

fn numeric_rank(kind: IntrinsicType) -> Option<u8> {
    let rank = match kind {
        IntrinsicType::Byte | IntrinsicType::SignedByte => 1,
        IntrinsicType::Short | IntrinsicType::UnsignedShort => 2,
        IntrinsicType::Integer | IntrinsicType::UnsignedInteger => 3,
        IntrinsicType::Long | IntrinsicType::UnsignedLong => 4,
        IntrinsicType::Single => 5,
        IntrinsicType::Double => 6,
        IntrinsicType::Decimal => 7,
        _ => return None,
    };
    Some(rank)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_widening_follows_rank() {
        assert!(widens(IntrinsicType::Integer, IntrinsicType::Double));
        assert!(widens(IntrinsicType::Byte, IntrinsicType::Integer));
        assert!(!widens(IntrinsicType::Double, IntrinsicType::Integer));
        assert!(!widens(IntrinsicType::Boolean, IntrinsicType::Integer));
    }
}
