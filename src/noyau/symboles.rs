// src/noyau/symboles.rs
//
// Table des symboles
// - natifs : tranche statique TRIÉE (ordre des octets) => recherche dichotomique
// - appelant : liste fournie à la compilation => parcours linéaire
// L’appelant est consulté en premier : il peut masquer un natif (ex: une variable "k").

use std::rc::Rc;

use super::arbre::{Contexte, Fermeture, FnFermeture, FnNative, Fonction, Variable, ARITE_MAX};
use super::erreurs::ErreurCompilation;
use super::fonctions::Operation;

#[derive(Clone, Copy, Debug)]
pub struct Symbole {
    pub nom: &'static str,
    pub op: Operation,
}

const fn sym(nom: &'static str, op: Operation) -> Symbole {
    Symbole { nom, op }
}

/// Natifs, triés par octets (majuscules avant minuscules).
pub static BUILTINS: &[Symbole] = &[
    sym("G", Operation::Giga),
    sym("M", Operation::Mega),
    sym("Mhz", Operation::Mega),
    sym("P", Operation::Peta),
    sym("T", Operation::Tera),
    sym("abs", Operation::Abs),
    sym("acos", Operation::Acos),
    sym("asin", Operation::Asin),
    sym("atan", Operation::Atan),
    sym("atan2", Operation::Atan2),
    sym("c", Operation::Centi),
    sym("cos", Operation::Cos),
    sym("cosh", Operation::Cosh),
    sym("d", Operation::Deci),
    sym("da", Operation::Deca),
    sym("fac", Operation::Fac),
    sym("h", Operation::Hecto),
    sym("k", Operation::Kilo),
    sym("ln", Operation::Ln),
    sym("log", Operation::Log),
    sym("log10", Operation::Log10),
    sym("m", Operation::Milli),
    sym("n", Operation::Nano),
    sym("ncr", Operation::Ncr),
    sym("npr", Operation::Npr),
    sym("p", Operation::Pico),
    sym("pow", Operation::Puissance),
    sym("sin", Operation::Sin),
    sym("sinh", Operation::Sinh),
    sym("sqrt", Operation::Sqrt),
    sym("tan", Operation::Tan),
    sym("tanh", Operation::Tanh),
    sym("u", Operation::Micro),
];

/// Ce qu’un nom désigne une fois résolu.
#[derive(Clone, Debug)]
pub enum Cible {
    Variable(Variable),
    Fonction(Fonction),
    Fermeture(Fermeture),
}

/// Entrée fournie par l’appelant.
#[derive(Clone, Debug)]
pub struct Liaison {
    pub nom: Rc<str>,
    pub cible: Cible,
}

impl Liaison {
    /// Lie `nom` à la cellule `variable` (partagée, pas copiée).
    pub fn variable(nom: &str, variable: &Variable) -> Self {
        Self {
            nom: Rc::from(nom),
            cible: Cible::Variable(variable.clone()),
        }
    }

    /// Fonction pure de l’appelant.
    pub fn fonction(nom: &str, arite: usize, appel: FnNative) -> Self {
        let nom: Rc<str> = Rc::from(nom);
        Self {
            cible: Cible::Fonction(Fonction::Native {
                nom: nom.clone(),
                appel,
                arite,
                pure: true,
            }),
            nom,
        }
    }

    /// Fonction de l’appelant avec contexte (reçu après les arguments).
    pub fn fermeture(nom: &str, arite: usize, appel: FnFermeture, contexte: Contexte) -> Self {
        let nom: Rc<str> = Rc::from(nom);
        Self {
            cible: Cible::Fermeture(Fermeture {
                nom: nom.clone(),
                appel,
                contexte,
                arite,
                pure: true,
            }),
            nom,
        }
    }

    /// Jamais pliée à la compilation (ex: lecture d’un capteur).
    pub fn impure(mut self) -> Self {
        match &mut self.cible {
            Cible::Fonction(Fonction::Native { pure, .. }) => *pure = false,
            Cible::Fermeture(f) => f.pure = false,
            Cible::Variable(_) | Cible::Fonction(Fonction::Interne(_)) => {}
        }
        self
    }

    pub fn arite(&self) -> usize {
        match &self.cible {
            Cible::Variable(_) => 0,
            Cible::Fonction(f) => f.arite(),
            Cible::Fermeture(f) => f.arite,
        }
    }
}

pub fn lookup_builtin(nom: &str) -> Option<Operation> {
    BUILTINS
        .binary_search_by(|s| s.nom.as_bytes().cmp(nom.as_bytes()))
        .ok()
        .map(|i| BUILTINS[i].op)
}

pub fn lookup_caller<'a>(vars: &'a [Liaison], nom: &str) -> Option<&'a Liaison> {
    vars.iter().find(|l| &*l.nom == nom)
}

/// Appelant d’abord, natifs ensuite.
pub fn lookup(vars: &[Liaison], nom: &str) -> Option<Cible> {
    if let Some(l) = lookup_caller(vars, nom) {
        return Some(l.cible.clone());
    }
    lookup_builtin(nom).map(|op| Cible::Fonction(Fonction::Interne(op)))
}

/// Refuse toute entrée déclarant plus de ARITE_MAX arguments.
pub fn verifier_liaisons(vars: &[Liaison]) -> Result<(), ErreurCompilation> {
    match vars.iter().find(|l| l.arite() > ARITE_MAX) {
        Some(l) => Err(ErreurCompilation::AriteHorsLimite {
            nom: l.nom.to_string(),
            arite: l.arite(),
        }),
        None => Ok(()),
    }
}
