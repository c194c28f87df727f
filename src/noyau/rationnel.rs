// src/noyau/rationnel.rs
//
// Rationnels exacts 64 bits + issue d’opération (Valeur)
// ------------------------------------------------------
// - Stockage : num_rational::Rational64, toujours réduit (pgcd), dénominateur > 0
// - Calculs intermédiaires en i128 (produits croisés sans débordement), puis réduction
// - Hors de la paire 64 bits => Infini ; forme indéterminée => Indefini
//
// Les anciennes sentinelles (-1/1 pour NaN, -10^15/1 pour l’infini) ne servent plus
// qu’à la frontière (to_pair) : à l’intérieur, Indefini/Infini sont des variantes
// distinctes et ne se confondent jamais avec un vrai rationnel.

use num_bigint::BigInt;
use num_rational::{BigRational, Ratio, Rational64};
use num_traits::{ToPrimitive, Zero};

/// Paire renvoyée à la frontière pour NOT-A-NUMBER.
pub const NAN_PAIR: (i64, i64) = (-1, 1);

/// Paire renvoyée à la frontière pour INFINITY.
pub const INFINITY_PAIR: (i64, i64) = (-1_000_000_000_000_000, 1);

/// Au-delà, 10^e ne tient plus dans la paire 64 bits quel que soit le facteur.
const EXPOSANT_DIX_MAX: u64 = 40;

/// Issue exacte d’une opération.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Valeur {
    Nombre(Rational64),
    Indefini, // ex: fac(-1), 0/0
    Infini,   // ex: 1/0, débordement 64 bits
}

impl Valeur {
    pub fn entier(n: i64) -> Self {
        Valeur::Nombre(Rational64::from_integer(n))
    }

    pub fn zero() -> Self {
        Valeur::entier(0)
    }

    /// Le rationnel porté, s’il y en a un.
    pub fn rationnel(&self) -> Option<Rational64> {
        match self {
            Valeur::Nombre(r) => Some(*r),
            _ => None,
        }
    }

    /// Valeur entière (dénominateur 1), sinon None.
    pub fn as_entier(&self) -> Option<i64> {
        match self {
            Valeur::Nombre(r) if r.is_integer() => Some(*r.numer()),
            _ => None,
        }
    }

    pub fn est_nombre(&self) -> bool {
        matches!(self, Valeur::Nombre(_))
    }

    /// Paire (numérateur, dénominateur) pour la couche d’intégration.
    /// Indefini/Infini redeviennent les sentinelles historiques.
    pub fn to_pair(&self) -> (i64, i64) {
        match self {
            Valeur::Nombre(r) => (*r.numer(), *r.denom()),
            Valeur::Indefini => NAN_PAIR,
            Valeur::Infini => INFINITY_PAIR,
        }
    }
}

impl From<Rational64> for Valeur {
    fn from(r: Rational64) -> Self {
        Valeur::Nombre(r)
    }
}

impl From<i64> for Valeur {
    fn from(n: i64) -> Self {
        Valeur::entier(n)
    }
}

/* ------------------------ Réduction ------------------------ */

/// Réduit n/d, remonte le signe au numérateur puis rétrécit en 64 bits.
fn reduire(n: i128, d: i128) -> Valeur {
    if d == 0 {
        return if n == 0 {
            Valeur::Indefini
        } else {
            Valeur::Infini
        };
    }

    // Ratio::new normalise : pgcd + dénominateur > 0
    let r = Ratio::<i128>::new(n, d);
    match (i64::try_from(*r.numer()), i64::try_from(*r.denom())) {
        (Ok(n), Ok(d)) => Valeur::Nombre(Rational64::new_raw(n, d)),
        _ => Valeur::Infini,
    }
}

fn paire_large(r: Rational64) -> (i128, i128) {
    (i128::from(*r.numer()), i128::from(*r.denom()))
}

/// Rationnel 64 bits -> BigRational (déjà réduit).
pub(crate) fn vers_big(r: Rational64) -> BigRational {
    BigRational::new_raw(BigInt::from(*r.numer()), BigInt::from(*r.denom()))
}

/// BigRational -> Valeur : Infini si numérateur ou dénominateur sort de i64.
pub(crate) fn depuis_big(r: &BigRational) -> Valeur {
    match (r.numer().to_i64(), r.denom().to_i64()) {
        (Some(n), Some(d)) => Valeur::Nombre(Rational64::new_raw(n, d)),
        _ => Valeur::Infini,
    }
}

/// Propagation : Indefini l’emporte, puis Infini, sinon on calcule.
pub(crate) fn combiner(
    a: Valeur,
    b: Valeur,
    f: impl FnOnce(Rational64, Rational64) -> Valeur,
) -> Valeur {
    match (a, b) {
        (Valeur::Indefini, _) | (_, Valeur::Indefini) => Valeur::Indefini,
        (Valeur::Infini, _) | (_, Valeur::Infini) => Valeur::Infini,
        (Valeur::Nombre(x), Valeur::Nombre(y)) => f(x, y),
    }
}

/* ------------------------ Opérations ------------------------ */

/// n/d réduit. d == 0 : Indefini si n == 0, sinon Infini.
pub fn fraction(n: i64, d: i64) -> Valeur {
    reduire(i128::from(n), i128::from(d))
}

pub fn add(a: Valeur, b: Valeur) -> Valeur {
    combiner(a, b, |x, y| {
        let ((xn, xd), (yn, yd)) = (paire_large(x), paire_large(y));
        reduire(xn * yd + yn * xd, xd * yd)
    })
}

pub fn subtract(a: Valeur, b: Valeur) -> Valeur {
    combiner(a, b, |x, y| {
        let ((xn, xd), (yn, yd)) = (paire_large(x), paire_large(y));
        reduire(xn * yd - yn * xd, xd * yd)
    })
}

pub fn multiply(a: Valeur, b: Valeur) -> Valeur {
    combiner(a, b, |x, y| {
        let ((xn, xd), (yn, yd)) = (paire_large(x), paire_large(y));
        reduire(xn * yn, xd * yd)
    })
}

/// a/b = (a.num * b.den) / (a.den * b.num) ; b == 0 => Infini (0/0 => Indefini).
pub fn divide(a: Valeur, b: Valeur) -> Valeur {
    combiner(a, b, |x, y| {
        let ((xn, xd), (yn, yd)) = (paire_large(x), paire_large(y));
        reduire(xn * yd, xd * yn)
    })
}

/// Change seulement le signe du numérateur.
pub fn negate(a: Valeur) -> Valeur {
    match a {
        Valeur::Nombre(x) => {
            let (n, d) = paire_large(x);
            reduire(-n, d)
        }
        autre => autre,
    }
}

/// a × 10^b, b entier (dénominateur 1) sinon Indefini.
/// Exposant négatif : division exacte (pas de troncature).
/// Résultat non représentable dans la paire 64 bits => Infini, y compris les valeurs
/// minuscules dont le dénominateur déborde (1e-30, 1e-50).
pub fn raise_by_power_of_ten(a: Valeur, b: Valeur) -> Valeur {
    combiner(a, b, |x, y| {
        if !y.is_integer() {
            return Valeur::Indefini;
        }
        if x.is_zero() {
            return Valeur::zero();
        }

        let e = *y.numer();
        if e.unsigned_abs() > EXPOSANT_DIX_MAX {
            return Valeur::Infini;
        }

        let p = BigInt::from(10).pow(e.unsigned_abs() as u32);
        let big = vers_big(x);
        let r = if e >= 0 {
            big * BigRational::from_integer(p)
        } else {
            big / BigRational::from_integer(p)
        };
        depuis_big(&r)
    })
}
