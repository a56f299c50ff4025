//! Lowering of every member body in the program

use crate::implementation::ImplementationBuilder;
use sb_diagnostics::{Diagnostic, ErrorReporter};
use sb_model::{
    BodyPart, ImplementationKey, MemberKind, ScriptModel, SymbolId, SymbolImplementation, TypeKind,
};

/// Lowers the bodies of all members of the given types
///
/// A member whose lowering fails is reported and skipped; its siblings are
/// still lowered so one compilation surfaces as many errors as possible.
pub struct CodeBuilder<'a, R: ErrorReporter> {
    model: &'a mut ScriptModel,
    reporter: &'a mut R,
}

impl<'a, R: ErrorReporter> CodeBuilder<'a, R> {
    /// Create a builder writing into `model`
    pub fn new(model: &'a mut ScriptModel, reporter: &'a mut R) -> Self {
        Self { model, reporter }
    }

    /// Lower every member of `types` that has no implementation yet
    ///
    /// Imported types and delegates are skipped; they are never emitted.
    pub fn build(&mut self, types: &[SymbolId]) {
        let _span = tracing::info_span!("lower_bodies", types = types.len()).entered();

        for &ty in types {
            let Some(data) = self.model.type_data(ty) else {
                continue;
            };
            if !data.is_application || data.kind == TypeKind::Delegate {
                continue;
            }

            for member in self.model.members(ty).to_vec() {
                if self.model.has_implementation(member) {
                    continue;
                }
                match self.build_member(member) {
                    Ok(bodies) => tracing::debug!(
                        member = %self.model.full_name(member),
                        bodies,
                        "lowered member"
                    ),
                    Err(diagnostic) => self.reporter.report(diagnostic),
                }
            }
        }
    }

    /// Lower and store every body of one member, returning how many were stored
    fn build_member(&mut self, member: SymbolId) -> Result<usize, Diagnostic> {
        let Some(kind) = self.model.member_data(member).map(|data| data.kind) else {
            return Ok(0);
        };

        let mut builder = ImplementationBuilder::new(&mut *self.model);
        let bodies: Vec<(BodyPart, Option<SymbolImplementation>)> = match kind {
            MemberKind::Field => vec![(BodyPart::Body, builder.build_field(member)?)],
            MemberKind::Method => vec![(BodyPart::Body, builder.build_method(member)?)],
            MemberKind::Constructor => vec![(BodyPart::Body, builder.build_constructor(member)?)],
            MemberKind::Property | MemberKind::Indexer => vec![
                (BodyPart::Getter, builder.build_getter(member)?),
                (BodyPart::Setter, builder.build_setter(member)?),
            ],
            MemberKind::Event => vec![
                (BodyPart::Adder, builder.build_adder(member)?),
                (BodyPart::Remover, builder.build_remover(member)?),
            ],
            MemberKind::EnumField { .. } | MemberKind::AnonymousMethod { .. } => Vec::new(),
        };

        for (method, implementation) in builder.finish() {
            self.model
                .set_implementation(ImplementationKey::body(method), implementation);
        }

        let mut stored = 0;
        for (part, implementation) in bodies {
            if let Some(implementation) = implementation {
                self.model
                    .set_implementation(ImplementationKey::part(member, part), implementation);
                stored += 1;
            }
        }
        Ok(stored)
    }
}
