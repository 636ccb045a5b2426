#![forbid(unsafe_code)]

use std::fmt;

use prism_core::intrinsics::{CatalogEntry, CatalogSource};
use prism_core::{
    ArgumentConversion, ConversionSequence, Remarks, Resolution, SignatureId, TypeDescriptor,
};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ResolveReport {
    pub call: String,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved: Option<ResolvedCall>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResolvedCall {
    pub signature: String,
    pub instance: u32,
    pub opcode: u32,
    pub ret: String,
    pub params: Vec<String>,
    pub cost: u64,
    pub candidates_considered: usize,
    pub conversions: Vec<ArgumentReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArgumentReport {
    pub into_param: SequenceReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub out_of_param: Option<SequenceReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SequenceReport {
    pub dimension: String,
    pub component: String,
    pub remarks: Vec<&'static str>,
}

impl From<&ConversionSequence> for SequenceReport {
    fn from(seq: &ConversionSequence) -> Self {
        Self {
            dimension: format!("{:?}", seq.dimension),
            component: format!("{:?}", seq.component),
            remarks: remark_names(seq.remarks),
        }
    }
}

impl From<&ArgumentConversion> for ArgumentReport {
    fn from(c: &ArgumentConversion) -> Self {
        Self {
            into_param: (&c.into_param).into(),
            out_of_param: c.out_of_param.as_ref().map(Into::into),
        }
    }
}

impl ResolvedCall {
    pub fn new(r: &Resolution) -> Self {
        Self {
            signature: signature_label(r.signature),
            instance: r.instance.id,
            opcode: r.instance.opcode,
            ret: r.instance.ret.to_string(),
            params: r.instance.params.iter().map(ToString::to_string).collect(),
            cost: r.cost,
            candidates_considered: r.candidates_considered,
            conversions: r.conversions.iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for ResolveReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(r) = &self.resolved else {
            return write!(f, "{}: {}", self.call, self.error.as_deref().unwrap_or("failed"));
        };
        writeln!(f, "{} -> {} ({})", self.call, r.ret, r.signature)?;
        writeln!(f, "  params: ({})", r.params.join(", "))?;
        writeln!(
            f,
            "  cost: {} ({} candidates, instance #{}, opcode {})",
            r.cost, r.candidates_considered, r.instance, r.opcode
        )?;
        for (i, c) in r.conversions.iter().enumerate() {
            write!(f, "  arg {}: {}", i + 1, c.into_param)?;
            if let Some(back) = &c.out_of_param {
                write!(f, "; back: {back}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Display for SequenceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.dimension, self.component)?;
        if !self.remarks.is_empty() {
            write!(f, " [{}]", self.remarks.join(", "))?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ConvertReport {
    pub from: String,
    pub to: String,
    pub explicit: bool,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence: Option<SequenceReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl fmt::Display for ConvertReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.sequence, &self.error) {
            (Some(seq), _) => write!(f, "{} -> {}: {seq}", self.from, self.to),
            (None, Some(err)) => write!(f, "{err}"),
            (None, None) => write!(f, "{} -> {}: rejected", self.from, self.to),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CombineReport {
    pub left: String,
    pub right: String,
    pub result: Option<String>,
}

impl fmt::Display for CombineReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.result {
            Some(k) => write!(f, "{} + {} = {k}", self.left, self.right),
            None => write!(f, "{} and {} have no common kind", self.left, self.right),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ClassifyReport {
    pub ty: String,
    pub shape: String,
    pub element: String,
    pub rows: u32,
    pub cols: u32,
    pub total_elements: u64,
}

impl ClassifyReport {
    pub fn new(ty: String, d: &TypeDescriptor) -> Self {
        Self {
            ty,
            shape: format!("{:?}", d.shape).to_lowercase(),
            element: d.element.to_string(),
            rows: d.rows,
            cols: d.cols,
            total_elements: d.total_elements,
        }
    }
}

impl fmt::Display for ClassifyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} of {} ({}x{}, {} elements)",
            self.ty, self.shape, self.element, self.rows, self.cols, self.total_elements
        )
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SignatureLine {
    pub signature: String,
    pub opcode: u32,
    pub declaration: String,
}

impl From<CatalogEntry<'_>> for SignatureLine {
    fn from(e: CatalogEntry<'_>) -> Self {
        Self {
            signature: signature_label(e.id),
            opcode: e.intrinsic.opcode,
            declaration: e.intrinsic.describe(),
        }
    }
}

impl fmt::Display for SignatureLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<20} {}", self.signature, self.declaration)
    }
}

/// `builtin:Texture2D#3`, `builtin#12` for globals, `external:0#1`.
pub fn signature_label(id: SignatureId) -> String {
    match id.source {
        CatalogSource::Builtin("") => format!("builtin#{}", id.index),
        CatalogSource::Builtin(table) => format!("builtin:{table}#{}", id.index),
        CatalogSource::External(n) => format!("external:{n}#{}", id.index),
    }
}

fn remark_names(remarks: Remarks) -> Vec<&'static str> {
    remarks
        .iter_names()
        .map(|(name, _)| match name {
            "IDENTICAL" => "identical",
            "TO_VOID" => "to-void",
            "ELT_TRUNCATION" => "truncation",
            "PRECISION_LOSS" => "precision-loss",
            _ => "other",
        })
        .collect()
}
