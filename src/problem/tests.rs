use super::*;
use crate::error::{InputError, KwdError};
use crate::types::*;

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Support {
        Support::new(&[0, 0, 1, 1], &[0, 1, 0, 1]).unwrap()
    }

    #[test]
    fn test_support_merges_duplicates() {
        let support = Support::new(&[2, 5, 2, 7], &[3, 1, 3, 0]).unwrap();
        assert_eq!(support.len(), 3);
        assert_eq!(support.input_len(), 4);
        assert_eq!(support.point_of_input(0), support.point_of_input(2));
        assert_eq!(support.find(Point::new(7, 0)).map(|id| id.index()), Some(2));
        assert_eq!(support.find(Point::new(9, 9)), None);

        let dist = Distribution::new(&support, &[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(dist.weights(), &[4.0, 2.0, 4.0]);
        assert_eq!(dist.mass(), 10.0);
    }

    #[test]
    fn test_support_rejects_bad_input() {
        assert_eq!(Support::new(&[], &[]).err(), Some(InputError::EmptyInput));
        assert_eq!(
            Support::new(&[0, 1], &[0]).err(),
            Some(InputError::LengthMismatch {
                field: "Y",
                expected: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn test_distribution_validation() {
        let support = square();
        assert!(matches!(
            Distribution::named("A", &support, &[1.0, 0.0, 0.0]),
            Err(InputError::LengthMismatch { field: "A", .. })
        ));
        assert_eq!(
            Distribution::named("B", &support, &[1.0, -0.5, 0.0, 0.0]).err(),
            Some(InputError::NegativeWeight {
                field: "B",
                index: 1,
                value: -0.5
            })
        );
        assert_eq!(
            Distribution::named("A", &support, &[1.0, f64::NAN, 0.0, 0.0]).err(),
            Some(InputError::NonFiniteWeight { field: "A", index: 1 })
        );
        assert_eq!(
            Distribution::named("A", &support, &[0.0; 4]).err(),
            Some(InputError::ZeroMass { field: "A" })
        );
    }

    #[test]
    fn test_balance_normalizes() {
        let support = square();
        let a = Distribution::new(&support, &[2.0, 0.0, 0.0, 0.0]).unwrap();
        let b = Distribution::new(&support, &[0.0, 0.0, 0.0, 4.0]).unwrap();
        assert_eq!(a.balance(&b, true).unwrap(), vec![1.0, 0.0, 0.0, -1.0]);

        let same = a.balance(&a.clone(), true).unwrap();
        assert!(same.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_balance_without_normalization() {
        let support = square();
        let a = Distribution::new(&support, &[2.0, 0.0, 0.0, 0.0]).unwrap();
        let b = Distribution::new(&support, &[0.0, 0.0, 0.0, 4.0]).unwrap();
        assert!(matches!(
            a.balance(&b, false),
            Err(KwdError::Infeasible { supply, demand }) if supply == 2.0 && demand == 4.0
        ));

        let c = Distribution::new(&support, &[0.0, 1.0, 1.0, 0.0]).unwrap();
        assert_eq!(a.balance(&c, false).unwrap(), vec![2.0, -1.0, -1.0, 0.0]);
    }

    #[test]
    fn test_balance_rejects_foreign_support() {
        let first = square();
        let second = square();
        let a = Distribution::new(&first, &[1.0; 4]).unwrap();
        let b = Distribution::new(&second, &[1.0; 4]).unwrap();
        assert!(matches!(
            a.balance(&b, true),
            Err(KwdError::Input(InputError::ForeignSupport))
        ));
    }

    #[test]
    fn test_index_window_and_nearest() {
        let support = Support::new(&[0, 1, 2, 5, 1], &[0, 1, 2, 5, -1]).unwrap();
        let index = support.index();
        assert_eq!(index.len(), 5);

        let window: Vec<usize> = index
            .within_window(Point::new(1, 1), 1)
            .into_iter()
            .map(|id| id.index())
            .collect();
        assert_eq!(window, vec![0, 1, 2]);

        let nearest = index.nearest_where(Point::new(0, 0), |id| id.index() >= 3);
        assert_eq!(nearest.map(|id| id.index()), Some(4));
        assert_eq!(support.extent(), (5, 6));
    }

    #[test]
    fn test_chebyshev_index_beats_euclidean_order() {
        // From the origin (4, 0) is closer in Euclidean terms, (3, 3) in Chebyshev terms.
        let points = [Point::new(0, 0), Point::new(4, 0), Point::new(3, 3), Point::new(1, 0)];
        let mut index = ChebyshevIndex::new(&points);

        index.remove(0);
        index.remove(3);
        let mut best = None;
        index.lower_closest(0, &mut best);
        assert_eq!(best, Some((3, 0, 2)));

        // A closer point put back lowers the bound further.
        index.insert(3);
        index.lower_closest(0, &mut best);
        assert_eq!(best, Some((1, 0, 3)));

        // A bound that is already lower is kept.
        let mut best = Some((0, 0, 0));
        index.lower_closest(1, &mut best);
        assert_eq!(best, Some((0, 0, 0)));
    }
}
