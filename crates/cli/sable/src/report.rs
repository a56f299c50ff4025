//! JSON summary of a compilation

use sb_driver::Compilation;
use sb_model::{BodyPart, ScriptModel, SymbolId, dump_implementation};
use serde::Serialize;

/// Every output name and lowered body of a compiled program
#[derive(Debug, Serialize)]
pub struct Report {
    pub script_name: String,
    pub minimized: bool,
    pub types: Vec<TypeReport>,
}

#[derive(Debug, Serialize)]
pub struct TypeReport {
    pub name: String,
    pub output_name: String,
    pub members: Vec<MemberReport>,
}

#[derive(Debug, Serialize)]
pub struct MemberReport {
    pub name: String,
    pub output_name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub bodies: Vec<BodyReport>,
}

#[derive(Debug, Serialize)]
pub struct BodyReport {
    pub part: &'static str,
    pub code: String,
}

impl Report {
    pub fn build(compilation: &Compilation, minimized: bool) -> Self {
        let model = &compilation.model;
        let types = compilation
            .types
            .iter()
            .map(|ty| TypeReport {
                name: model.full_name(*ty),
                output_name: model.output_name(*ty).to_string(),
                members: model
                    .members(*ty)
                    .iter()
                    .map(|member| member_report(model, *member))
                    .collect(),
            })
            .collect();

        Self {
            script_name: model.metadata.script_name.clone(),
            minimized,
            types,
        }
    }
}

fn member_report(model: &ScriptModel, member: SymbolId) -> MemberReport {
    let bodies = model
        .implementations()
        .filter(|(key, _)| key.member == member)
        .map(|(key, implementation)| BodyReport {
            part: part_name(key.part),
            code: dump_implementation(model, implementation),
        })
        .collect();

    MemberReport {
        name: model.name(member).to_string(),
        output_name: model.output_name(member).to_string(),
        parameters: model
            .parameters(member)
            .iter()
            .map(|parameter| model.output_name(*parameter).to_string())
            .collect(),
        bodies,
    }
}

fn part_name(part: BodyPart) -> &'static str {
    match part {
        BodyPart::Body => "body",
        BodyPart::Getter => "get",
        BodyPart::Setter => "set",
        BodyPart::Adder => "add",
        BodyPart::Remover => "remove",
    }
}
