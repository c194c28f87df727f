// src/noyau/arbre.rs
//
// AST exact à arité variable.
// - Constante : Valeur déjà calculée
// - Variable  : cellule partagée avec l’appelant (relue à chaque évaluation)
// - Fonction  : opération native ou fonction de l’appelant + enfants (0..=7)
// - Fermeture : fonction de l’appelant + contexte opaque passé en dernier argument
//
// Invariant : enfants.len() == arité. Chaque nœud possède ses enfants (arbre, pas de partage).

use std::any::Any;
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use super::fonctions::Operation;
use super::rationnel::Valeur;

/// Arité maximale d’une fonction ou d’une fermeture.
pub const ARITE_MAX: usize = 7;

/// Fonction de l’appelant (sans contexte).
pub type FnNative = fn(&[Valeur]) -> Valeur;

/// Fonction de l’appelant recevant son contexte après les arguments.
pub type FnFermeture = fn(&[Valeur], &dyn Any) -> Valeur;

/// Contexte opaque d’une fermeture.
pub type Contexte = Rc<dyn Any>;

/// Cellule de variable partagée entre l’appelant et l’arbre compilé.
#[derive(Clone, Debug)]
pub struct Variable(Rc<Cell<Valeur>>);

impl Variable {
    pub fn new(valeur: impl Into<Valeur>) -> Self {
        Variable(Rc::new(Cell::new(valeur.into())))
    }

    pub fn get(&self) -> Valeur {
        self.0.get()
    }

    pub fn set(&self, valeur: impl Into<Valeur>) {
        self.0.set(valeur.into());
    }

    /// Même cellule (pas seulement même valeur).
    pub fn meme_cellule(&self, autre: &Variable) -> bool {
        Rc::ptr_eq(&self.0, &autre.0)
    }
}

#[derive(Clone, Debug)]
pub enum Fonction {
    Interne(Operation),
    Native {
        nom: Rc<str>,
        appel: FnNative,
        arite: usize,
        pure: bool,
    },
}

impl Fonction {
    pub fn arite(&self) -> usize {
        match self {
            Fonction::Interne(op) => op.arite(),
            Fonction::Native { arite, .. } => *arite,
        }
    }

    pub fn pure(&self) -> bool {
        match self {
            Fonction::Interne(op) => op.pure(),
            Fonction::Native { pure, .. } => *pure,
        }
    }

    pub fn nom(&self) -> &str {
        match self {
            Fonction::Interne(op) => op.nom(),
            Fonction::Native { nom, .. } => &**nom,
        }
    }

    pub fn appeler(&self, args: &[Valeur]) -> Valeur {
        match self {
            Fonction::Interne(op) => op.appliquer(args),
            Fonction::Native { appel, .. } => appel(args),
        }
    }
}

#[derive(Clone)]
pub struct Fermeture {
    pub nom: Rc<str>,
    pub appel: FnFermeture,
    pub contexte: Contexte,
    pub arite: usize,
    pub pure: bool,
}

impl Fermeture {
    pub fn appeler(&self, args: &[Valeur]) -> Valeur {
        (self.appel)(args, self.contexte.as_ref())
    }
}

impl fmt::Debug for Fermeture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fermeture")
            .field("nom", &self.nom)
            .field("arite", &self.arite)
            .field("pure", &self.pure)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug)]
pub enum Noeud {
    Constante(Valeur),
    Variable {
        nom: Rc<str>,
        variable: Variable,
    },
    Fonction {
        fonction: Fonction,
        enfants: Vec<Noeud>,
    },
    Fermeture {
        fermeture: Fermeture,
        enfants: Vec<Noeud>,
    },
}

impl Noeud {
    /// Nœud d’opération native.
    pub fn operation(op: Operation, enfants: Vec<Noeud>) -> Noeud {
        Noeud::Fonction {
            fonction: Fonction::Interne(op),
            enfants,
        }
    }

    pub fn est_constante(&self) -> bool {
        matches!(self, Noeud::Constante(_))
    }

    pub fn enfants(&self) -> &[Noeud] {
        match self {
            Noeud::Constante(_) | Noeud::Variable { .. } => &[],
            Noeud::Fonction { enfants, .. } | Noeud::Fermeture { enfants, .. } => enfants.as_slice(),
        }
    }

    /// Pliable à la compilation (les feuilles ne se plient pas : elles sont déjà finales).
    pub fn pure(&self) -> bool {
        match self {
            Noeud::Constante(_) | Noeud::Variable { .. } => false,
            Noeud::Fonction { fonction, .. } => fonction.pure(),
            Noeud::Fermeture { fermeture, .. } => fermeture.pure,
        }
    }

    /// Nombre total de nœuds (itératif).
    pub fn nb_noeuds(&self) -> usize {
        let mut pile: Vec<&Noeud> = vec![self];
        let mut total = 0;
        while let Some(n) = pile.pop() {
            total += 1;
            pile.extend(n.enfants().iter());
        }
        total
    }

    /// Hauteur de l’arbre (feuille = 1), itératif.
    pub fn hauteur(&self) -> usize {
        let mut pile: Vec<(&Noeud, usize)> = vec![(self, 1)];
        let mut max = 0;
        while let Some((n, h)) = pile.pop() {
            max = max.max(h);
            pile.extend(n.enfants().iter().map(|e| (e, h + 1)));
        }
        max
    }
}
