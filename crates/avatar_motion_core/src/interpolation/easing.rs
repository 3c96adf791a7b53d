/// Cubic Hermite ease of `x` clamped to `[0, 1]`.
pub fn smoothstep(x: f32) -> f32 {
    let x = x.clamp(0., 1.);
    x * x * (3. - 2. * x)
}

/// [`smoothstep`] remapped so that `edge_0` maps to 0 and `edge_1` maps to 1.
pub fn smoothstep_between(edge_0: f32, edge_1: f32, x: f32) -> f32 {
    if edge_1 == edge_0 {
        return if x < edge_0 { 0. } else { 1. };
    }
    smoothstep((x - edge_0) / (edge_1 - edge_0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smoothstep_endpoints_and_midpoint() {
        assert_eq!(smoothstep(-1.), 0.);
        assert_eq!(smoothstep(0.), 0.);
        assert_eq!(smoothstep(0.5), 0.5);
        assert_eq!(smoothstep(1.), 1.);
        assert_eq!(smoothstep(3.), 1.);
    }

    #[test]
    fn smoothstep_between_handles_degenerate_edges() {
        assert_eq!(smoothstep_between(0.2, 0.2, 0.1), 0.);
        assert_eq!(smoothstep_between(0.2, 0.2, 0.3), 1.);
        assert_eq!(smoothstep_between(-1., 1., 0.), 0.5);
    }
}
