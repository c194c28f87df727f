//! Noyau : évaluation de l’arbre
//!
//! Parcours postfixe : enfants de gauche à droite dans un tampon fixe [Valeur; 7],
//! puis appel de l’opération (les fermetures reçoivent leur contexte en plus).
//! L’évaluation n’échoue jamais : nombre d’enfants incohérent => Indefini.

use super::arbre::{Noeud, ARITE_MAX};
use super::rationnel::Valeur;

/// Un seul cadre de pile par niveau d’arbre.
pub fn evaluate(noeud: &Noeud) -> Valeur {
    let (enfants, arite) = match noeud {
        Noeud::Constante(v) => return *v,
        Noeud::Variable { variable, .. } => return variable.get(),
        Noeud::Fonction { fonction, enfants } => (enfants, fonction.arite()),
        Noeud::Fermeture { fermeture, enfants } => (enfants, fermeture.arite),
    };
    if enfants.len() != arite || arite > ARITE_MAX {
        return Valeur::Indefini;
    }

    let mut tampon = [Valeur::Indefini; ARITE_MAX];
    for (i, enfant) in enfants.iter().enumerate() {
        tampon[i] = evaluate(enfant);
    }
    let args = &tampon[..arite];

    match noeud {
        Noeud::Fonction { fonction, .. } => fonction.appeler(args),
        Noeud::Fermeture { fermeture, .. } => fermeture.appeler(args),
        Noeud::Constante(_) | Noeud::Variable { .. } => Valeur::Indefini,
    }
}
