use crate::value::LogValue;

/// A type that can be logged as a named entry.
///
/// Implemented for the primitive scalars, strings, vectors and slices of
/// those, and the geometry types. `LogEngine::log` takes any `Loggable` and
/// hands the value back unchanged, so it can wrap an expression in place.
pub trait Loggable {
    /// Converts self into the tagged value written to the log.
    fn to_log_value(&self) -> LogValue;
}

impl Loggable for LogValue {
    fn to_log_value(&self) -> LogValue {
        self.clone()
    }
}

macro_rules! impl_loggable {
    ($($ty:ty => $scalar:ident, $array:ident);* $(;)?) => {
        $(
            impl Loggable for $ty {
                fn to_log_value(&self) -> LogValue {
                    LogValue::$scalar(*self)
                }
            }

            impl Loggable for Vec<$ty> {
                fn to_log_value(&self) -> LogValue {
                    LogValue::$array(self.clone())
                }
            }

            impl Loggable for &[$ty] {
                fn to_log_value(&self) -> LogValue {
                    LogValue::$array(self.to_vec())
                }
            }

            impl<const N: usize> Loggable for [$ty; N] {
                fn to_log_value(&self) -> LogValue {
                    LogValue::$array(self.to_vec())
                }
            }
        )*
    };
}

impl_loggable! {
    bool => Boolean, BooleanArray;
    i32 => Int32, Int32Array;
    i64 => Int64, Int64Array;
    f32 => Float, FloatArray;
    f64 => Double, DoubleArray;
}

impl Loggable for String {
    fn to_log_value(&self) -> LogValue {
        LogValue::String(self.clone())
    }
}

impl Loggable for &str {
    fn to_log_value(&self) -> LogValue {
        LogValue::String((*self).to_string())
    }
}

impl Loggable for Vec<String> {
    fn to_log_value(&self) -> LogValue {
        LogValue::StringArray(self.clone())
    }
}

impl Loggable for &[String] {
    fn to_log_value(&self) -> LogValue {
        LogValue::StringArray(self.to_vec())
    }
}

impl Loggable for Vec<&str> {
    fn to_log_value(&self) -> LogValue {
        LogValue::StringArray(self.iter().map(|s| s.to_string()).collect())
    }
}

impl Loggable for &[&str] {
    fn to_log_value(&self) -> LogValue {
        LogValue::StringArray(self.iter().map(|s| s.to_string()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_conversion() {
        assert_eq!(true.to_log_value(), LogValue::Boolean(true));
        assert_eq!(12345i32.to_log_value(), LogValue::Int32(12345));
        assert_eq!(7i64.to_log_value(), LogValue::Int64(7));
        assert_eq!(1.5f32.to_log_value(), LogValue::Float(1.5));
        assert_eq!(3.14159f64.to_log_value(), LogValue::Double(3.14159));
    }

    #[test]
    fn test_string_conversion() {
        assert_eq!("Hello".to_log_value(), LogValue::String("Hello".into()));
        assert_eq!(
            vec!["a", "bb"].to_log_value(),
            LogValue::StringArray(vec!["a".into(), "bb".into()])
        );
    }

    #[test]
    fn test_array_conversion() {
        assert_eq!(
            [1.0f64, 2.0].to_log_value(),
            LogValue::DoubleArray(vec![1.0, 2.0])
        );
        let flags: &[bool] = &[true, false];
        assert_eq!(flags.to_log_value(), LogValue::BooleanArray(vec![true, false]));
        assert_eq!(vec![1i32, 2].to_log_value().type_tag(), "int64[]");
    }
}
