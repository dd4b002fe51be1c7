use core::str::FromStr;

use rand::Rng;

/// Distribution of generated input values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Values {
    /// Uniform integers in `low..=high`, stored as f32. Products and sums of
    /// small integers are exact, so any disagreement is a real bug.
    SmallInts { low: i32, high: i32 },
    /// Uniform floats in `[0, 1)`.
    UnitFloats,
}

impl Default for Values {
    fn default() -> Self {
        Values::SmallInts { low: 1, high: 10 }
    }
}

impl Values {
    /// Draw one value.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        match *self {
            Values::SmallInts { low, high } => rng.gen_range(low..=high) as f32,
            Values::UnitFloats => rng.r#gen::<f32>(),
        }
    }

    /// Overwrite every element of `buf`.
    pub fn fill<R: Rng + ?Sized>(&self, rng: &mut R, buf: &mut [f32]) {
        for x in buf {
            *x = self.sample(rng);
        }
    }

    /// Allocate and fill a vector of length `n`.
    pub fn vec<R: Rng + ?Sized>(&self, rng: &mut R, n: usize) -> Vec<f32> {
        let mut v = vec![0.0; n];
        self.fill(rng, &mut v);
        v
    }
}

impl FromStr for Values {
    type Err = String;

    /// Accepts `ints` (small integers `1..=10`) and `unit`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "unit" => Ok(Values::UnitFloats),
            "ints" => Ok(Values::default()),
            other => Err(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn small_ints_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let v = Values::default().vec(&mut rng, 1000);
        assert!(v.iter().all(|x| (1.0..=10.0).contains(x) && x.fract() == 0.0));
    }

    #[test]
    fn unit_floats_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let v = Values::UnitFloats.vec(&mut rng, 1000);
        assert!(v.iter().all(|x| (0.0..1.0).contains(x)));
    }

    #[test]
    fn same_seed_same_values() {
        let a = Values::UnitFloats.vec(&mut StdRng::seed_from_u64(42), 16);
        let b = Values::UnitFloats.vec(&mut StdRng::seed_from_u64(42), 16);
        assert_eq!(a, b);
    }

    #[test]
    fn parse() {
        assert_eq!("unit".parse(), Ok(Values::UnitFloats));
        assert_eq!("ints".parse(), Ok(Values::SmallInts { low: 1, high: 10 }));
        assert_eq!(" unit ".parse(), Ok(Values::UnitFloats));
        assert_eq!("ints:-3..3".parse::<Values>(), Err("ints:-3..3".to_string()));
        assert!("gaussian".parse::<Values>().is_err());
    }
}
