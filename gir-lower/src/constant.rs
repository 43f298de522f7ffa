//! Constant value rendering

use crate::ir::{ConstantRecord, RationalRecord};
use gir_frontend::{ConstValue, ExactInt, ExactRational};

fn int_record(value: &ExactInt) -> Box<ConstantRecord> {
    Box::new(ConstantRecord::Int {
        value: value.to_string(),
    })
}

fn rational(value: &ExactRational) -> RationalRecord {
    RationalRecord {
        numerator: int_record(&value.numerator),
        denominator: int_record(&value.denominator),
    }
}

/// Render an exact constant; constants of unknown kind have no record.
pub fn render_constant(value: &ConstValue) -> Option<ConstantRecord> {
    let record = match value {
        ConstValue::Bool(b) => ConstantRecord::Bool {
            value: b.to_string(),
        },
        ConstValue::String(quoted) => ConstantRecord::String {
            value: quoted.clone(),
        },
        ConstValue::Int(n) => ConstantRecord::Int {
            value: n.to_string(),
        },
        ConstValue::Float(r) => {
            let RationalRecord {
                numerator,
                denominator,
            } = rational(r);
            ConstantRecord::Float {
                numerator,
                denominator,
            }
        }
        ConstValue::Complex { real, imag } => {
            let RationalRecord {
                numerator,
                denominator,
            } = rational(real);
            ConstantRecord::Complex {
                numerator,
                denominator,
                imaginary: rational(imag),
            }
        }
        ConstValue::Unknown => return None,
    };
    Some(record)
}
