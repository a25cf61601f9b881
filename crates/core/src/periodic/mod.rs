use std::f64::consts::PI;

/// Number of entries in the table, one per integer degree.
pub const TABLE_SIZE: usize = 360;

/// Precomputed sine values for integer-degree angles.
#[derive(Debug, Clone)]
pub struct SineTable {
    values: [f32; TABLE_SIZE],
}

impl SineTable {
    pub fn build() -> Self {
        let mut values = [0.0_f32; TABLE_SIZE];
        for (degree, value) in values.iter_mut().enumerate() {
            *value = (degree as f64 * PI / 180.0).sin() as f32;
        }
        Self { values }
    }

    /// Looks up `sin(angle°)`. Any integer is accepted; negative angles wrap
    /// back into `[0, 360)`.
    pub fn sample(&self, angle: i64) -> f32 {
        let index = angle.rem_euclid(TABLE_SIZE as i64) as usize;
        self.values[index]
    }
}

impl Default for SineTable {
    fn default() -> Self {
        Self::build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f32 = 1e-6;

    #[test]
    fn cardinal_angles_match_unit_circle() {
        let table = SineTable::build();

        assert_eq!(table.sample(0), 0.0);
        assert!((table.sample(90) - 1.0).abs() < TOLERANCE);
        assert!(table.sample(180).abs() < TOLERANCE);
        assert!((table.sample(270) + 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn sampling_is_periodic() {
        let table = SineTable::build();

        for angle in -1080..1080 {
            let base = table.sample(angle);
            assert_eq!(base, table.sample(angle + 360));
            assert_eq!(base, table.sample(angle - 360));
        }
    }

    #[test]
    fn negative_angles_wrap_into_range() {
        let table = SineTable::build();

        assert_eq!(table.sample(-90), table.sample(270));
        assert_eq!(table.sample(-1), table.sample(359));
        assert_eq!(table.sample(i64::MIN), table.sample(i64::MIN.rem_euclid(360)));
    }
}
