use serde_json::Value;

use crate::error::GeoViewError;

/// Iterates depth-first over all positions of a GeoJSON `coordinates`
/// member and yields `(longitude, latitude)` pairs.
///
/// A node whose first element is a number is a position. A node whose first
/// element is an array is descended into. Empty arrays yield nothing.
/// Anything else is reported as a [`GeoViewError::MalformedGeometry`], after
/// which the iterator is exhausted.
pub struct CoordinateWalker<'a> {
    stack: Vec<&'a Value>,
    feature: usize,
    failed: bool,
}

impl<'a> CoordinateWalker<'a> {
    /// Walk `coordinates`. `feature` is the index of the owning feature and
    /// only used for error reporting.
    pub fn new(coordinates: &'a Value, feature: usize) -> Self {
        Self {
            stack: vec![coordinates],
            feature,
            failed: false,
        }
    }

    fn fail(&mut self, reason: String) -> Option<Result<(f64, f64), GeoViewError>> {
        self.failed = true;
        self.stack.clear();
        Some(Err(GeoViewError::malformed_geometry(self.feature, reason)))
    }
}

impl<'a> Iterator for CoordinateWalker<'a> {
    type Item = Result<(f64, f64), GeoViewError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        while let Some(node) = self.stack.pop() {
            let Value::Array(elements) = node else {
                return self.fail(format!("expected an array, found `{node}'"));
            };

            match elements.first() {
                None => continue,
                Some(Value::Number(x)) => {
                    let Some(y) = elements.get(1) else {
                        return self.fail(format!(
                            "position `{node}' must have at least two elements"
                        ));
                    };
                    let (Some(x), Some(y)) = (x.as_f64(), y.as_f64()) else {
                        return self.fail(format!("position `{node}' is not numeric"));
                    };
                    return Some(Ok((x, y)));
                }
                Some(Value::Array(_)) => {
                    // push in reverse so children are visited in document order
                    self.stack.extend(elements.iter().rev());
                }
                Some(other) => {
                    return self.fail(format!("unexpected coordinate element `{other}'"));
                }
            }
        }

        None
    }
}
