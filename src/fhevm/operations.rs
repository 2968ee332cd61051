// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Homomorphic operations the network evaluates on ciphertext handles.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum OperationCategory {
    Arithmetic,
    Comparison,
    Logical,
    Bitwise,
    MinMax,
}

impl OperationCategory {
    pub const ALL: [OperationCategory; 5] = [
        OperationCategory::Arithmetic,
        OperationCategory::Comparison,
        OperationCategory::Logical,
        OperationCategory::Bitwise,
        OperationCategory::MinMax,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OperationCategory::Arithmetic => "arithmetic",
            OperationCategory::Comparison => "comparison",
            OperationCategory::Logical => "logical",
            OperationCategory::Bitwise => "bitwise",
            OperationCategory::MinMax => "minMax",
        }
    }

    /// Operations in this category, in registry order.
    pub fn operations(&self) -> Vec<FheOperation> {
        FheOperation::ALL
            .into_iter()
            .filter(|op| op.category() == *self)
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FheOperation {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    And,
    Or,
    Xor,
    Not,
    Shl,
    Shr,
    Min,
    Max,
}

impl FheOperation {
    pub const ALL: [FheOperation; 18] = [
        FheOperation::Add,
        FheOperation::Sub,
        FheOperation::Mul,
        FheOperation::Div,
        FheOperation::Eq,
        FheOperation::Ne,
        FheOperation::Gt,
        FheOperation::Gte,
        FheOperation::Lt,
        FheOperation::Lte,
        FheOperation::And,
        FheOperation::Or,
        FheOperation::Xor,
        FheOperation::Not,
        FheOperation::Shl,
        FheOperation::Shr,
        FheOperation::Min,
        FheOperation::Max,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FheOperation::Add => "add",
            FheOperation::Sub => "sub",
            FheOperation::Mul => "mul",
            FheOperation::Div => "div",
            FheOperation::Eq => "eq",
            FheOperation::Ne => "ne",
            FheOperation::Gt => "gt",
            FheOperation::Gte => "gte",
            FheOperation::Lt => "lt",
            FheOperation::Lte => "lte",
            FheOperation::And => "and",
            FheOperation::Or => "or",
            FheOperation::Xor => "xor",
            FheOperation::Not => "not",
            FheOperation::Shl => "shl",
            FheOperation::Shr => "shr",
            FheOperation::Min => "min",
            FheOperation::Max => "max",
        }
    }

    pub fn category(&self) -> OperationCategory {
        use FheOperation::*;
        match self {
            Add | Sub | Mul | Div => OperationCategory::Arithmetic,
            Eq | Ne | Gt | Gte | Lt | Lte => OperationCategory::Comparison,
            And | Or | Xor | Not => OperationCategory::Logical,
            Shl | Shr => OperationCategory::Bitwise,
            Min | Max => OperationCategory::MinMax,
        }
    }

    /// Number of ciphertext operands the operation takes.
    pub fn arity(&self) -> usize {
        match self {
            FheOperation::Not => 1,
            _ => 2,
        }
    }

    pub fn supported_names() -> String {
        FheOperation::ALL
            .iter()
            .map(FheOperation::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for FheOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FheOperation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FheOperation::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| format!("Unsupported operation: {s}"))
    }
}
