//! Geometry storage error types

/// Errors raised by the vertex and primitive stores
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeometryError {
    /// Vertex storage could not grow
    #[error("failed to allocate memory for {0} vertices")]
    VertexAlloc(usize),

    /// Primitive storage could not grow
    #[error("failed to allocate primitive memory")]
    PrimitiveAlloc,

    /// A primitive already holds the maximum number of sides
    #[error("failed to add side: too many sides (max {max})")]
    TooManySides { max: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            GeometryError::VertexAlloc(12).to_string(),
            "failed to allocate memory for 12 vertices"
        );
        assert_eq!(
            GeometryError::TooManySides { max: 256 }.to_string(),
            "failed to add side: too many sides (max 256)"
        );
    }
}
