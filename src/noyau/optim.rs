// src/noyau/optim.rs
//
// Pliage des constantes : un nœud pur dont tous les enfants sont des constantes
// est évalué une fois et remplacé sur place par une Constante.
// Les nœuds impurs ne sont jamais pliés, mais leurs sous-arbres purs le sont.

use super::arbre::Noeud;
use super::eval::evaluate;

/// Plie `noeud` en place ; renvoie le nombre de nœuds pliés.
pub fn optimize(noeud: &mut Noeud) -> usize {
    let (mut plis, constants) = match noeud {
        Noeud::Constante(_) | Noeud::Variable { .. } => return 0,
        Noeud::Fonction { enfants, .. } | Noeud::Fermeture { enfants, .. } => {
            let mut plis = 0;
            for enfant in enfants.iter_mut() {
                plis += optimize(enfant);
            }
            (plis, enfants.iter().all(Noeud::est_constante))
        }
    };

    if constants && noeud.pure() {
        let v = evaluate(noeud);
        *noeud = Noeud::Constante(v);
        plis += 1;
    }
    plis
}
