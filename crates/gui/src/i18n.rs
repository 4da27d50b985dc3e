use std::sync::atomic::{AtomicU8, Ordering};

use stl_viewer_lib::state::Language;

static CURRENT_LANG: AtomicU8 = AtomicU8::new(0); // 0=En (default)

pub fn lang() -> Language {
    match CURRENT_LANG.load(Ordering::Relaxed) {
        1 => Language::Fr,
        _ => Language::En,
    }
}

pub fn set_lang(l: Language) {
    CURRENT_LANG.store(
        match l {
            Language::En => 0,
            Language::Fr => 1,
        },
        Ordering::Relaxed,
    );
}

/// Translate a key to the current language.
pub fn t(key: &str) -> &'static str {
    let fr = lang() == Language::Fr;
    match key {
        // ── Main menus ──────────────────────────────────────
        "menu.file" => if fr { "Fichier" } else { "File" },
        "menu.open" => if fr { "Ouvrir un STL...  Ctrl+O" } else { "Open STL...  Ctrl+O" },
        "menu.open_title" => if fr { "Ouvrir un fichier STL" } else { "Open STL file" },
        "menu.clear" => if fr { "Fermer le modèle  Suppr" } else { "Clear model  Del" },
        "menu.quit" => if fr { "Quitter" } else { "Quit" },

        "menu.view" => if fr { "Affichage" } else { "View" },
        "menu.file_panel" => if fr { "Panneau fichier" } else { "File panel" },
        "menu.dimensions" => if fr { "Dimensions" } else { "Dimensions" },
        "menu.controls_hint" => if fr { "Aide des contrôles" } else { "Controls hint" },
        "menu.grid" => if fr { "Grille" } else { "Grid" },
        "menu.axes" => if fr { "Axes" } else { "Axes" },
        "menu.reset_camera" => if fr { "Recadrer la caméra  Début" } else { "Reset camera  Home" },
        "menu.language" => if fr { "Langue" } else { "Language" },

        "menu.settings" => if fr { "Réglages" } else { "Settings" },
        "menu.preferences" => if fr { "Préférences..." } else { "Preferences..." },

        // ── File panel ──────────────────────────────────────
        "file.heading" => if fr { "Fichier STL" } else { "STL file" },
        "file.drop_hint" => if fr { "Glissez un fichier .stl ici" } else { "Drop an .stl file here" },
        "file.or" => if fr { "ou" } else { "or" },
        "file.browse" => if fr { "Parcourir..." } else { "Browse..." },
        "file.name" => if fr { "Nom" } else { "Name" },
        "file.size" => if fr { "Taille" } else { "Size" },
        "file.format" => if fr { "Format" } else { "Format" },
        "file.triangles" => if fr { "Triangles" } else { "Triangles" },
        "file.vertices" => if fr { "Sommets" } else { "Vertices" },
        "file.clear" => if fr { "Supprimer le fichier" } else { "Remove file" },
        "file.loading" => if fr { "Chargement..." } else { "Loading..." },
        "file.not_stl" => if fr { "Seuls les fichiers .stl sont acceptés" } else { "Only .stl files are accepted" },
        "file.too_large" => if fr { "Fichier trop volumineux" } else { "File too large" },

        // ── Status bar ──────────────────────────────────────
        "status.idle" => if fr { "Aucun modèle" } else { "No model" },
        "status.loading" => if fr { "Chargement" } else { "Loading" },
        "status.ready" => if fr { "Prêt" } else { "Ready" },
        "status.failed" => if fr { "Échec" } else { "Failed" },
        "status.triangles" => if fr { "Triangles" } else { "Triangles" },

        // ── Viewport overlays ───────────────────────────────
        "view.empty" => if fr { "Chargez un fichier STL pour commencer" } else { "Load an STL file to get started" },
        "view.loading" => if fr { "Chargement du modèle..." } else { "Loading model..." },
        "view.controls" => if fr {
            "Clic gauche : rotation  •  Clic droit : déplacement  •  Molette : zoom"
        } else {
            "Left drag: rotate  •  Right drag: pan  •  Scroll: zoom"
        },
        "view.dimensions" => if fr { "Dimensions" } else { "Dimensions" },
        "view.width" => if fr { "Largeur" } else { "Width" },
        "view.height" => if fr { "Hauteur" } else { "Height" },
        "view.depth" => if fr { "Profondeur" } else { "Depth" },
        "view.load_failed" => if fr { "Impossible de charger le fichier" } else { "Could not load the file" },

        // ── Error kinds ─────────────────────────────────────
        "error.unreadable" => if fr { "Le fichier n'a pas pu être lu" } else { "The file could not be read" },
        "error.aborted" => if fr { "La lecture a été interrompue" } else { "Reading was interrupted" },
        "error.truncated" => if fr { "Le fichier est incomplet" } else { "The file is incomplete" },
        "error.truncated_binary" => if fr { "STL binaire tronqué" } else { "Truncated binary STL" },
        "error.malformed_ascii" => if fr { "STL ASCII mal formé" } else { "Malformed ASCII STL" },
        "error.empty_mesh" => if fr { "Le fichier ne contient aucun triangle" } else { "The file contains no triangles" },
        "error.unsupported_format" => if fr { "Format non reconnu" } else { "Unrecognized format" },

        // ── Settings window ─────────────────────────────────
        "settings.title" => if fr { "Préférences" } else { "Preferences" },
        "settings.general" => if fr { "Général" } else { "General" },
        "settings.units" => if fr { "Unités :" } else { "Units:" },
        "settings.mm" => if fr { "Millimètres" } else { "Millimeters" },
        "settings.cm" => if fr { "Centimètres" } else { "Centimeters" },
        "settings.m" => if fr { "Mètres" } else { "Meters" },
        "settings.in" => if fr { "Pouces" } else { "Inches" },
        "settings.dimensions" => if fr { "Dimensions" } else { "Dimensions" },
        "settings.dim_precision" => if fr { "Décimales :" } else { "Decimal places:" },
        "settings.dim_show_units" => if fr { "Afficher les unités" } else { "Show units" },
        "settings.grid" => if fr { "Grille" } else { "Grid" },
        "settings.grid_visible" => if fr { "Afficher la grille" } else { "Show grid" },
        "settings.grid_fit" => if fr { "Adapter au modèle" } else { "Fit to model" },
        "settings.grid_size" => if fr { "Taille de cellule :" } else { "Cell size:" },
        "settings.grid_range" => if fr { "Étendue :" } else { "Range:" },
        "settings.grid_opacity" => if fr { "Opacité :" } else { "Opacity:" },
        "settings.axes" => if fr { "Axes" } else { "Axes" },
        "settings.axes_visible" => if fr { "Afficher les axes" } else { "Show axes" },
        "settings.axes_labels" => if fr { "Étiquettes des axes" } else { "Axis labels" },
        "settings.axes_length" => if fr { "Longueur relative :" } else { "Relative length:" },
        "settings.viewport" => if fr { "Vue 3D" } else { "Viewport" },
        "settings.bg_color" => if fr { "Couleur de fond :" } else { "Background color:" },
        "settings.model_color" => if fr { "Couleur du modèle :" } else { "Model color:" },
        "settings.antialiasing" => if fr { "Anticrénelage (au redémarrage)" } else { "Anti-aliasing (on restart)" },
        "settings.loading" => if fr { "Chargement" } else { "Loading" },
        "settings.size_limit" => if fr { "Taille maximale" } else { "Size limit" },
        "settings.policy" => if fr { "Au-delà :" } else { "Above limit:" },
        "settings.policy_reject" => if fr { "Refuser" } else { "Reject" },
        "settings.policy_warn" => if fr { "Avertir" } else { "Warn" },
        "settings.require_ext" => if fr { "Exiger l'extension .stl" } else { "Require .stl extension" },
        "settings.normals" => if fr { "Normales :" } else { "Normals:" },
        "settings.normals_smooth" => if fr { "Lissées" } else { "Smooth" },
        "settings.normals_flat" => if fr { "Plates" } else { "Flat" },
        "settings.build_index" => if fr { "Fusionner les sommets" } else { "Weld vertices" },
        "settings.ui" => if fr { "Interface" } else { "Interface" },
        "settings.font_size" => if fr { "Taille de police :" } else { "Font size:" },
        "settings.language" => if fr { "Langue :" } else { "Language:" },
        "settings.apply" => if fr { "Appliquer" } else { "Apply" },
        "settings.reset" => if fr { "Réinitialiser" } else { "Reset" },
        "settings.close" => if fr { "Fermer" } else { "Close" },

        // ── Fallback ────────────────────────────────────────
        _ => "???",
    }
}
