//! Tests de propriétés (proptest) : invariants des rationnels + pipeline.

use num_rational::{Ratio, Rational64};
use proptest::prelude::*;

use super::rationnel::{add, divide, fraction, multiply, negate, subtract};
use super::{compile_avec, interpret, Options, Valeur};

fn petit() -> impl Strategy<Value = i64> {
    -1_000_000i64..=1_000_000i64
}

fn non_nul() -> impl Strategy<Value = i64> {
    prop_oneof![(-1_000_000i64..=-1i64), (1i64..=1_000_000i64)]
}

fn rationnel() -> impl Strategy<Value = Valeur> {
    (petit(), non_nul()).prop_map(|(n, d)| fraction(n, d))
}

proptest! {
    #[test]
    fn fraction_toujours_reduite(n in any::<i64>(), d in any::<i64>()) {
        prop_assume!(d != 0);
        match fraction(n, d) {
            Valeur::Nombre(r) => {
                let (num, den) = (*r.numer(), *r.denom());
                prop_assert!(den > 0);
                // forme normale : num-rational ne la change plus
                let normal = Rational64::new(num, den);
                prop_assert_eq!((*normal.numer(), *normal.denom()), (num, den));
                // même valeur : n * den == num * d
                prop_assert_eq!(i128::from(n) * i128::from(den), i128::from(num) * i128::from(d));
            }
            // seul débordement possible : i64::MIN / -k avec pgcd(2^63, k) = 1
            Valeur::Infini => {
                let exact = Ratio::<i128>::new(i128::from(n), i128::from(d));
                prop_assert!(i64::try_from(*exact.numer()).is_err());
            }
            Valeur::Indefini => prop_assert!(false, "indéfini pour {}/{}", n, d),
        }
    }

    #[test]
    fn minimum_divise(d in any::<i64>()) {
        prop_assume!(d != 0);
        // -2^63 / d : pgcd = plus grande puissance de 2 de d ; déborde ssi d négatif et impair
        let v = fraction(i64::MIN, d);
        prop_assert_eq!(v == Valeur::Infini, d < 0 && d % 2 != 0);
    }

    #[test]
    fn division_annule_multiplication(a in rationnel(), b in rationnel()) {
        prop_assume!(b != Valeur::zero());
        prop_assert_eq!(divide(multiply(a, b), b), a);
    }

    #[test]
    fn addition_et_multiplication_commutatives(a in rationnel(), b in rationnel()) {
        prop_assert_eq!(add(a, b), add(b, a));
        prop_assert_eq!(multiply(a, b), multiply(b, a));
    }

    #[test]
    fn soustraction_et_negation(a in rationnel(), b in rationnel()) {
        prop_assert_eq!(subtract(a, a), Valeur::zero());
        prop_assert_eq!(negate(negate(a)), a);
        prop_assert_eq!(subtract(a, b), add(a, negate(b)));
    }

    #[test]
    fn quotient_lu_exactement(n in petit(), d in non_nul()) {
        let v = interpret(&format!("({n})/({d})"));
        prop_assert_eq!(v, fraction(n, d));
    }

    #[test]
    fn decimal_lu_exactement(entier in 0i64..1_000_000, frac in 0i64..1000) {
        let v = interpret(&format!("{entier}.{frac:03}"));
        prop_assert_eq!(v, fraction(entier * 1000 + frac, 1000));
    }

    #[test]
    fn pliage_transparent(a in -50i64..50, b in -50i64..50, c in -50i64..50) {
        let expr = format!("({a} - {b}) * {c} / ({a} + {c}) + {b} ^ 2 % 7");
        let sans = Options::default().sans_pliage();
        let plie = compile_avec(&expr, &[], &Options::default());
        let brut = compile_avec(&expr, &[], &sans);
        match (plie, brut) {
            (Ok(p), Ok(b)) => {
                prop_assert!(p.racine().est_constante());
                prop_assert_eq!(p.evaluate(), b.evaluate());
            }
            _ => prop_assert!(false, "compilation refusée: {}", expr),
        }
    }
}
