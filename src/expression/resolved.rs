//! Resolved expression trees handed over by the planner.

use crate::batch::Channel;
use crate::types::DataType;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Scalar functions known to the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Function {
    Floor,
    Equals,
}

impl Function {
    pub const ALL: [Function; 2] = [Function::Floor, Function::Equals];

    pub fn name(self) -> &'static str {
        match self {
            Function::Floor => "floor",
            Function::Equals => "equals",
        }
    }

    /// Parameter names, in argument order, as they appear in evaluator
    /// display strings.
    pub fn params(self) -> &'static [&'static str] {
        match self {
            Function::Floor => &["val"],
            Function::Equals => &["lhs", "rhs"],
        }
    }

    pub fn arity(self) -> usize {
        self.params().len()
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Function {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "floor" => Ok(Function::Floor),
            "equals" | "eq" | "==" => Ok(Function::Equals),
            other => Err(format!("unknown function: {}", other)),
        }
    }
}

/// Expression tree whose leaves are already bound to channels and types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolvedExpr {
    /// Read one column of the input batch
    Attribute { channel: Channel, data_type: DataType },

    /// Apply a scalar function
    Call {
        function: Function,
        args: Vec<ResolvedExpr>,
    },
}

impl ResolvedExpr {
    pub fn attribute(channel: usize, data_type: DataType) -> Self {
        ResolvedExpr::Attribute {
            channel: Channel(channel),
            data_type,
        }
    }

    pub fn call(function: Function, args: Vec<ResolvedExpr>) -> Self {
        ResolvedExpr::Call { function, args }
    }

    pub fn floor(val: ResolvedExpr) -> Self {
        Self::call(Function::Floor, vec![val])
    }

    pub fn equals(lhs: ResolvedExpr, rhs: ResolvedExpr) -> Self {
        Self::call(Function::Equals, vec![lhs, rhs])
    }

    /// Channels read anywhere in the tree, in first-use order.
    pub fn channels(&self) -> Vec<Channel> {
        let mut channels = Vec::new();
        self.collect_channels(&mut channels);
        channels
    }

    fn collect_channels(&self, out: &mut Vec<Channel>) {
        match self {
            ResolvedExpr::Attribute { channel, .. } => {
                if !out.contains(channel) {
                    out.push(*channel);
                }
            }
            ResolvedExpr::Call { args, .. } => {
                for arg in args {
                    arg.collect_channels(out);
                }
            }
        }
    }
}
