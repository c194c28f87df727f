// src/noyau/fonctions.rs
//
// Opérations natives (opérateurs, constantes SI, fonctions)
// ---------------------------------------------------------
// Ensemble FERMÉ : chaque variante connaît son arité et sa pureté,
// le dispatch est un match exhaustif (pas de pointeurs ni de drapeaux).
//
// Règle “Q-pur” : une fonction ne rend un Nombre que si le résultat est
// rationnel ET exactement représentable ; sinon Indefini (irrationnel,
// hors domaine) ou Infini (pôle, débordement 64 bits).

use num_bigint::BigUint;
use num_rational::Rational64;
use num_traits::{ToPrimitive, Zero};

use super::rationnel::{
    add, combiner, depuis_big, divide, fraction, multiply, negate, raise_by_power_of_ten,
    subtract, vers_big, Valeur,
};

/// Au-delà, une base autre que 0/±1 déborde forcément la paire 64 bits.
const EXPOSANT_MAX: u64 = 64;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    // --- opérateurs ---
    Addition,
    Soustraction,
    Multiplication,
    Division,
    Modulo,
    Puissance,
    PuissanceDix, // a e b = a × 10^b
    Negation,
    Virgule, // "a, b" => b

    // --- constantes SI (arité 0) ---
    Pico,
    Nano,
    Micro,
    Milli,
    Centi,
    Deci,
    Deca,
    Hecto,
    Kilo,
    Mega,
    Giga,
    Tera,
    Peta,

    // --- fonctions ---
    Abs,
    Acos,
    Asin,
    Atan,
    Atan2,
    Cos,
    Cosh,
    Fac,
    Ln,
    Log, // base 10, ou naturel selon Options::log_naturel (résolu au lexeur)
    Log10,
    Ncr,
    Npr,
    Sin,
    Sinh,
    Sqrt,
    Tan,
    Tanh,
}

impl Operation {
    pub fn arite(self) -> usize {
        use Operation::*;
        match self {
            Pico | Nano | Micro | Milli | Centi | Deci | Deca | Hecto | Kilo | Mega | Giga
            | Tera | Peta => 0,

            Negation | Abs | Acos | Asin | Atan | Cos | Cosh | Fac | Ln | Log | Log10 | Sin
            | Sinh | Sqrt | Tan | Tanh => 1,

            Addition | Soustraction | Multiplication | Division | Modulo | Puissance
            | PuissanceDix | Virgule | Atan2 | Ncr | Npr => 2,
        }
    }

    /// Toutes les opérations natives sont pures (pliables à la compilation).
    pub fn pure(self) -> bool {
        true
    }

    /// Opérateur écrit entre ses deux opérandes.
    pub fn est_infixe(self) -> bool {
        use Operation::*;
        matches!(
            self,
            Addition | Soustraction | Multiplication | Division | Modulo | Puissance | PuissanceDix
        )
    }

    /// Nom (ou symbole) utilisé pour l’affichage.
    pub fn nom(self) -> &'static str {
        use Operation::*;
        match self {
            Addition => "+",
            Soustraction => "-",
            Multiplication => "*",
            Division => "/",
            Modulo => "%",
            Puissance => "^",
            PuissanceDix => "e",
            Negation => "-",
            Virgule => ",",

            Pico => "p",
            Nano => "n",
            Micro => "u",
            Milli => "m",
            Centi => "c",
            Deci => "d",
            Deca => "da",
            Hecto => "h",
            Kilo => "k",
            Mega => "M",
            Giga => "G",
            Tera => "T",
            Peta => "P",

            Abs => "abs",
            Acos => "acos",
            Asin => "asin",
            Atan => "atan",
            Atan2 => "atan2",
            Cos => "cos",
            Cosh => "cosh",
            Fac => "fac",
            Ln => "ln",
            Log => "log",
            Log10 => "log10",
            Ncr => "ncr",
            Npr => "npr",
            Sin => "sin",
            Sinh => "sinh",
            Sqrt => "sqrt",
            Tan => "tan",
            Tanh => "tanh",
        }
    }

    /// Applique l’opération. Nombre d’arguments incorrect => Indefini.
    pub fn appliquer(self, args: &[Valeur]) -> Valeur {
        use Operation::*;

        if args.len() != self.arite() {
            return Valeur::Indefini;
        }

        match self {
            Addition => add(args[0], args[1]),
            Soustraction => subtract(args[0], args[1]),
            Multiplication => multiply(args[0], args[1]),
            Division => divide(args[0], args[1]),
            Modulo => modulo(args[0], args[1]),
            Puissance => puissance(args[0], args[1]),
            PuissanceDix => raise_by_power_of_ten(args[0], args[1]),
            Negation => negate(args[0]),
            Virgule => args[1],

            Pico => si(-12),
            Nano => si(-9),
            Micro => si(-6),
            Milli => si(-3),
            Centi => si(-2),
            Deci => si(-1),
            Deca => si(1),
            Hecto => si(2),
            Kilo => si(3),
            Mega => si(6),
            Giga => si(9),
            Tera => si(12),
            Peta => si(15),

            Abs => abs(args[0]),
            Fac => fac(args[0]),
            Ncr => ncr(args[0], args[1]),
            Npr => npr(args[0], args[1]),
            Sqrt => puissance(args[0], fraction(1, 2)),
            Log | Log10 => log10(args[0]),
            Ln => ln(args[0]),

            // rationnelles seulement en 0 (ou 1 pour acos)
            Sin | Tan | Asin | Atan | Sinh | Tanh => image_en(args[0], 0, 0),
            Cos | Cosh => image_en(args[0], 0, 1),
            Acos => image_en(args[0], 1, 0),
            Atan2 => atan2(args[0], args[1]),
        }
    }
}

/* ------------------------ Outils ------------------------ */

fn unaire(a: Valeur, f: impl FnOnce(Rational64) -> Valeur) -> Valeur {
    match a {
        Valeur::Nombre(x) => f(x),
        autre => autre,
    }
}

/// Entier naturel (dénominateur 1, >= 0), sinon None.
fn entier_naturel(x: Rational64) -> Option<i64> {
    if x.is_integer() && *x.numer() >= 0 {
        Some(*x.numer())
    } else {
        None
    }
}

/// 10^e en rationnel exact (|e| <= 18).
fn si(e: i32) -> Valeur {
    let p = 10_i64.pow(e.unsigned_abs());
    if e >= 0 {
        fraction(p, 1)
    } else {
        fraction(1, p)
    }
}

/// n = 10^k ? (n >= 1)
fn exposant_dix(mut n: i64) -> Option<i64> {
    if n < 1 {
        return None;
    }
    let mut k = 0;
    while n % 10 == 0 {
        n /= 10;
        k += 1;
    }
    (n == 1).then_some(k)
}

/* ------------------------ Arithmétique ------------------------ */

fn abs(a: Valeur) -> Valeur {
    unaire(a, |x| {
        if *x.numer() < 0 {
            negate(Valeur::Nombre(x))
        } else {
            Valeur::Nombre(x)
        }
    })
}

/// Reste tronqué : a - b × trunc(a/b) (signe du dividende). b == 0 => Indefini.
fn modulo(a: Valeur, b: Valeur) -> Valeur {
    combiner(a, b, |x, y| {
        if y.is_zero() {
            return Valeur::Indefini;
        }
        let (bx, by) = (vers_big(x), vers_big(y));
        let q = (&bx / &by).trunc();
        depuis_big(&(bx - by * q))
    })
}

/// a^b exact.
/// - b entier : puissance exacte (0^négatif => Infini, 0^0 => 1)
/// - b = p/q : exacte si a est une puissance q-ième parfaite, sinon Indefini
pub fn puissance(a: Valeur, b: Valeur) -> Valeur {
    combiner(a, b, |x, y| {
        let (p, q) = (*y.numer(), *y.denom());
        let base = if q == 1 {
            x
        } else {
            match racine_exacte(x, q) {
                Some(r) => r,
                None => return Valeur::Indefini,
            }
        };
        puissance_entiere(base, p)
    })
}

fn puissance_entiere(x: Rational64, e: i64) -> Valeur {
    if e == 0 {
        return Valeur::entier(1);
    }
    if x.is_zero() {
        return if e > 0 { Valeur::zero() } else { Valeur::Infini };
    }

    let (n, d) = (*x.numer(), *x.denom());

    // ±1 : pas de débordement possible, quel que soit l’exposant
    if d == 1 && (n == 1 || n == -1) {
        return if n == -1 && e % 2 != 0 {
            Valeur::entier(-1)
        } else {
            Valeur::entier(1)
        };
    }

    if e.unsigned_abs() > EXPOSANT_MAX {
        return Valeur::Infini;
    }

    let k = e.unsigned_abs() as u32;
    let big = vers_big(x);
    let (num, den) = (big.numer().pow(k), big.denom().pow(k));
    let r = if e > 0 {
        num_rational::BigRational::new(num, den)
    } else {
        num_rational::BigRational::new(den, num)
    };
    depuis_big(&r)
}

/// Racine q-ième exacte (q >= 2), None si irrationnelle ou paire (q pair, x < 0).
fn racine_exacte(x: Rational64, q: i64) -> Option<Rational64> {
    if x.is_zero() {
        return Some(x);
    }

    let negatif = *x.numer() < 0;
    if negatif && q % 2 == 0 {
        return None;
    }

    if q as u64 > EXPOSANT_MAX {
        // seule |x| = 1 a une racine rationnelle à ce degré
        return (x.is_integer() && x.numer().unsigned_abs() == 1).then_some(x);
    }

    let q = q as u32;
    let racine = |m: u64| -> Option<u64> {
        let m = BigUint::from(m);
        let r = m.nth_root(q);
        if r.pow(q) == m {
            r.to_u64()
        } else {
            None
        }
    };

    let n = racine(x.numer().unsigned_abs())?;
    let d = racine(x.denom().unsigned_abs())?;

    // n <= |x.numer| et d <= x.denom : tiennent en i64
    let n = i64::try_from(n).ok()?;
    let d = i64::try_from(d).ok()?;
    Some(Rational64::new_raw(if negatif { -n } else { n }, d))
}

/* ------------------------ Combinatoire ------------------------ */

/// n! pour n entier naturel ; débordement => Infini (dès 21!).
fn fac(a: Valeur) -> Valeur {
    unaire(a, |x| {
        let Some(n) = entier_naturel(x) else {
            return Valeur::Indefini;
        };
        let mut acc: i64 = 1;
        for i in 2..=n {
            acc = match acc.checked_mul(i) {
                Some(v) => v,
                None => return Valeur::Infini,
            };
        }
        Valeur::entier(acc)
    })
}

/// Combinaisons C(n, r). r > n ou non entier naturel => Indefini.
fn ncr(a: Valeur, b: Valeur) -> Valeur {
    combiner(a, b, |x, y| {
        let (Some(n), Some(r)) = (entier_naturel(x), entier_naturel(y)) else {
            return Valeur::Indefini;
        };
        if r > n {
            return Valeur::Indefini;
        }

        let r = r.min(n - r);
        let (n, r) = (i128::from(n), i128::from(r));

        // acc_i = C(n-r+i, i) : croissant, donc le premier débordement est définitif
        let mut acc: i128 = 1;
        for i in 1..=r {
            acc = acc * (n - r + i) / i;
            if acc > i128::from(i64::MAX) {
                return Valeur::Infini;
            }
        }
        Valeur::entier(acc as i64)
    })
}

/// Arrangements P(n, r) = n! / (n-r)!.
fn npr(a: Valeur, b: Valeur) -> Valeur {
    combiner(a, b, |x, y| {
        let (Some(n), Some(r)) = (entier_naturel(x), entier_naturel(y)) else {
            return Valeur::Indefini;
        };
        if r > n {
            return Valeur::Indefini;
        }

        // n (n-1) … (n-r+1) ; r = 0 => produit vide
        let mut acc: i64 = 1;
        for k in 0..r {
            acc = match acc.checked_mul(n - k) {
                Some(v) => v,
                None => return Valeur::Infini,
            };
        }
        Valeur::entier(acc)
    })
}

/* ------------------------ Logarithmes ------------------------ */

/// log10 exact sur les puissances de dix (10^k et 1/10^k).
fn log10(a: Valeur) -> Valeur {
    unaire(a, |x| {
        if x.is_zero() {
            return Valeur::Infini;
        }
        let (n, d) = (*x.numer(), *x.denom());
        if n < 0 {
            return Valeur::Indefini;
        }
        if d == 1 {
            if let Some(k) = exposant_dix(n) {
                return Valeur::entier(k);
            }
        }
        if n == 1 {
            if let Some(k) = exposant_dix(d) {
                return Valeur::entier(-k);
            }
        }
        Valeur::Indefini
    })
}

fn ln(a: Valeur) -> Valeur {
    unaire(a, |x| {
        if x.is_zero() {
            Valeur::Infini
        } else if x == Rational64::from_integer(1) {
            Valeur::zero()
        } else {
            Valeur::Indefini
        }
    })
}

/* ------------------------ Trigonométrie ------------------------ */

/// f(point) = image, partout ailleurs le résultat est irrationnel.
fn image_en(a: Valeur, point: i64, image: i64) -> Valeur {
    unaire(a, |x| {
        if x == Rational64::from_integer(point) {
            Valeur::entier(image)
        } else {
            Valeur::Indefini
        }
    })
}

/// atan2(y, x) : 0 pour y = 0, x > 0.
fn atan2(a: Valeur, b: Valeur) -> Valeur {
    combiner(a, b, |y, x| {
        if y.is_zero() && *x.numer() > 0 {
            Valeur::zero()
        } else {
            Valeur::Indefini
        }
    })
}
