use super::Scene;
use tracing::{debug, warn};

const SCENE_MARKER: &str = "SCENE:";
const CHARACTER_MARKER: &str = "CHARACTER:";
const COMMENT_MARKERS: [&str; 2] = ["#", "//"];

/// Split a script into scenes.
///
/// Best effort: the parser never fails. Lines that cannot be attached to a
/// scene with a description (anything before the first `SCENE:` marker, or
/// under a `SCENE:` marker with no text) are discarded and reported once.
pub fn parse_script(text: &str) -> Vec<Scene> {
    let mut scenes = Vec::new();
    let mut current = Scene::new("");
    let mut discarded = 0;

    for line in text.lines().map(str::trim).filter(|line| !line.is_empty()) {
        if let Some(rest) = line.strip_prefix(SCENE_MARKER) {
            discarded += seal(&mut scenes, current);
            current = Scene::new(rest.trim());
        } else if let Some(rest) = line.strip_prefix(CHARACTER_MARKER) {
            current.characters.push(rest.trim().to_string());
        } else if COMMENT_MARKERS.iter().any(|marker| line.starts_with(marker)) {
            continue;
        } else {
            current.actions.push(line.to_string());
        }
    }
    discarded += seal(&mut scenes, current);

    if discarded > 0 {
        warn!(
            "Discarded {} script line(s) not attached to a described scene",
            discarded
        );
    }
    debug!("Parsed {} scenes from script", scenes.len());

    scenes
}

/// Push `scene` if it has a description, otherwise return how many lines it swallowed.
fn seal(scenes: &mut Vec<Scene>, scene: Scene) -> usize {
    if scene.description.is_empty() {
        scene.characters.len() + scene.actions.len()
    } else {
        scenes.push(scene);
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIZARD_SCRIPT: &str = r#"
    SCENE: A magical forest at sunset with glowing fireflies
    CHARACTER: Young wizard with flowing robes
    CHARACTER: Magical crystal staff
    The wizard raises their staff toward the sky
    Magical energy swirls around the crystal
    The fireflies gather in a spiral pattern

    SCENE: Ancient stone circle under starlight
    CHARACTER: Wizard
    CHARACTER: Spirit guardians
    The wizard steps into the center of the circle
    Ethereal spirit guardians materialize around them
    Magic pulses through the stone circle
    "#;

    #[test]
    fn parses_two_scene_script() {
        let scenes = parse_script(WIZARD_SCRIPT);
        assert_eq!(scenes.len(), 2);

        assert_eq!(
            scenes[0].description,
            "A magical forest at sunset with glowing fireflies"
        );
        assert_eq!(
            scenes[0].characters,
            vec!["Young wizard with flowing robes", "Magical crystal staff"]
        );
        assert_eq!(
            scenes[0].actions,
            vec![
                "The wizard raises their staff toward the sky",
                "Magical energy swirls around the crystal",
                "The fireflies gather in a spiral pattern",
            ]
        );

        assert_eq!(scenes[1].description, "Ancient stone circle under starlight");
        assert_eq!(scenes[1].characters, vec!["Wizard", "Spirit guardians"]);
        assert_eq!(scenes[1].actions.len(), 3);
        assert_eq!(scenes[1].actions[0], "The wizard steps into the center of the circle");
    }

    #[test]
    fn script_without_scene_markers_is_empty() {
        assert!(parse_script("").is_empty());
        assert!(parse_script("just some narration\nCHARACTER: nobody").is_empty());
    }

    #[test]
    fn lines_before_first_scene_are_dropped() {
        let scenes = parse_script(
            "CHARACTER: Stray\nan orphan action\nSCENE: Harbor at dawn\nBoats drift out",
        );
        assert_eq!(scenes.len(), 1);
        assert!(scenes[0].characters.is_empty());
        assert_eq!(scenes[0].actions, vec!["Boats drift out"]);
    }

    #[test]
    fn comments_and_blank_lines_are_ignored() {
        let scenes = parse_script(
            "SCENE: Desert\n# camera pans left\n\n   \n// TODO: more sand\nA camel walks by",
        );
        assert_eq!(scenes.len(), 1);
        assert_eq!(scenes[0].actions, vec!["A camel walks by"]);
    }

    #[test]
    fn empty_scene_marker_swallows_its_own_lines() {
        let scenes = parse_script(
            "SCENE: First\nfirst action\nSCENE:\nlost action\nSCENE: Third\nthird action",
        );
        assert_eq!(scenes.len(), 2);
        assert_eq!(scenes[0].actions, vec!["first action"]);
        assert_eq!(scenes[1].description, "Third");
        assert_eq!(scenes[1].actions, vec!["third action"]);
    }

    #[test]
    fn final_scene_is_sealed_without_trailing_newline() {
        let scenes = parse_script("SCENE: Only one");
        assert_eq!(scenes, vec![Scene::new("Only one")]);
    }

    #[test]
    fn markers_are_trimmed_and_case_sensitive() {
        let scenes = parse_script(
            "   SCENE:    Rooftop   \r\n  CHARACTER:   Cat  \r\nscene: not a marker\r\n",
        );
        assert_eq!(scenes.len(), 1);
        assert_eq!(scenes[0].description, "Rooftop");
        assert_eq!(scenes[0].characters, vec!["Cat"]);
        assert_eq!(scenes[0].actions, vec!["scene: not a marker"]);
    }

    #[test]
    fn scene_count_matches_described_markers() {
        let script = (0..7)
            .map(|i| format!("SCENE: place {i}\naction {i}\n"))
            .collect::<String>();
        let scenes = parse_script(&script);
        assert_eq!(scenes.len(), 7);
        for (i, scene) in scenes.iter().enumerate() {
            assert_eq!(scene.actions, vec![format!("action {i}")]);
        }
    }
}
