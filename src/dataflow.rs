//! Adapter from data-flow engine values.
//!
//! The engine tracks facts about expressions; three of them can seed a range
//! set: an already-computed range fact, a constant, and a variable of a known
//! primitive type.

use crate::set::IntSet;
use crate::types::{PrimitiveType, ScalarValue};

/// A value as seen by the data-flow engine.
#[derive(Debug, Clone, PartialEq)]
pub enum DataFlowValue {
    /// A fact-map value whose range fact may or may not be known.
    RangeFact(Option<IntSet>),
    /// A compile-time constant.
    Constant(ScalarValue),
    /// A variable of a declared primitive type.
    Variable(PrimitiveType),
}

impl IntSet {
    /// The set of possible values of a data-flow value, or `None` when the
    /// engine has no range information for it.
    pub fn from_data_flow_value(value: &DataFlowValue) -> Option<IntSet> {
        match value {
            DataFlowValue::RangeFact(range) => range.clone(),
            DataFlowValue::Constant(constant) => IntSet::from_constant(*constant),
            DataFlowValue::Variable(ty) => IntSet::from_type(*ty),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_fact() {
        let fact = DataFlowValue::RangeFact(Some(IntSet::range(1, 5)));
        assert_eq!(IntSet::from_data_flow_value(&fact), Some(IntSet::range(1, 5)));
        assert_eq!(IntSet::from_data_flow_value(&DataFlowValue::RangeFact(None)), None);
    }

    #[test]
    fn test_constant() {
        let constant = DataFlowValue::Constant(ScalarValue::I32(42));
        assert_eq!(IntSet::from_data_flow_value(&constant), Some(IntSet::point(42)));
        let unsupported = DataFlowValue::Constant(ScalarValue::F64(0.5));
        assert_eq!(IntSet::from_data_flow_value(&unsupported), None);
    }

    #[test]
    fn test_variable() {
        let variable = DataFlowValue::Variable(PrimitiveType::Short);
        assert_eq!(IntSet::from_data_flow_value(&variable), Some(IntSet::SHORT));
        let unsupported = DataFlowValue::Variable(PrimitiveType::Double);
        assert_eq!(IntSet::from_data_flow_value(&unsupported), None);
    }
}
