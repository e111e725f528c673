//! Sentinel-delimited generated sections in task role command lists.
//!
//! A section is a contiguous run of command lines bounded by a known
//! begin/end sentinel pair. Sections are located as explicit ranges over
//! the current list state; a list is re-scanned after every removal since
//! indices shift.

use crate::tensorboard::tensorboard_port_name;
use rigger_protocol::constants::{
    CUSTOM_STORAGE_BEGIN, CUSTOM_STORAGE_END, TEAM_DATA_BEGIN, TEAM_DATA_END, TENSORBOARD_BEGIN,
    TENSORBOARD_END,
};
use rigger_protocol::JobProtocol;

/// The kinds of auto-generated sections, in strip order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    CustomStorage,
    TeamData,
    TensorBoard,
}

impl SectionKind {
    pub const ALL: [SectionKind; 3] = [Self::CustomStorage, Self::TeamData, Self::TensorBoard];

    pub fn begin_marker(self) -> &'static str {
        match self {
            Self::CustomStorage => CUSTOM_STORAGE_BEGIN,
            Self::TeamData => TEAM_DATA_BEGIN,
            Self::TensorBoard => TENSORBOARD_BEGIN,
        }
    }

    pub fn end_marker(self) -> &'static str {
        match self {
            Self::CustomStorage => CUSTOM_STORAGE_END,
            Self::TeamData => TEAM_DATA_END,
            Self::TensorBoard => TENSORBOARD_END,
        }
    }
}

/// A located section. `start` and `end` are the marker line indices,
/// both inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section {
    pub kind: SectionKind,
    pub start: usize,
    pub end: usize,
}

/// Locate a well-formed section: the first begin marker, then the first
/// end marker strictly after it. Markers match whole lines exactly, so an
/// edited or indented sentinel counts as malformed and the section is not
/// found.
pub fn find_section(commands: &[String], kind: SectionKind) -> Option<Section> {
    let start = commands
        .iter()
        .position(|line| line.as_str() == kind.begin_marker())?;
    let offset = commands[start + 1..]
        .iter()
        .position(|line| line.as_str() == kind.end_marker())?;
    Some(Section {
        kind,
        start,
        end: start + 1 + offset,
    })
}

/// Remove a section if it is present and well-formed. Returns the range
/// that was removed.
pub fn strip_section(commands: &mut Vec<String>, kind: SectionKind) -> Option<Section> {
    let section = find_section(commands, kind)?;
    commands.drain(section.start..=section.end);
    Some(section)
}

/// Strip every auto-generated section from every task role, and drop the
/// TensorBoard port registration when the document declares a TensorBoard
/// extras block. User-authored commands are left untouched.
pub fn strip_generated_sections(protocol: &mut JobProtocol) {
    let tensorboard_port = protocol
        .extras
        .as_ref()
        .and_then(|extras| extras.tensor_board.as_ref())
        .map(|tb| tensorboard_port_name(&tb.random_str));

    for role in protocol.task_roles.iter_mut() {
        if role.spec.commands.is_empty() {
            continue;
        }
        for kind in SectionKind::ALL {
            strip_section(&mut role.spec.commands, kind);
        }
        if let Some(port) = &tensorboard_port {
            role.spec.resource_per_instance.ports.remove(port);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_find_section() {
        let commands = lines(&[
            "echo before",
            TEAM_DATA_BEGIN,
            "mount /data",
            TEAM_DATA_END,
            "echo after",
        ]);
        let section = find_section(&commands, SectionKind::TeamData).unwrap();
        assert_eq!(section.start, 1);
        assert_eq!(section.end, 3);
        assert!(find_section(&commands, SectionKind::TensorBoard).is_none());
    }

    #[test]
    fn test_find_section_requires_end_after_begin() {
        // A lone end marker before the begin marker is not a section...
        let commands = lines(&[TEAM_DATA_END, "echo x", TEAM_DATA_BEGIN]);
        assert!(find_section(&commands, SectionKind::TeamData).is_none());

        // ...but does not veto a later well-formed pair.
        let commands = lines(&[TEAM_DATA_END, TEAM_DATA_BEGIN, "mount", TEAM_DATA_END]);
        let section = find_section(&commands, SectionKind::TeamData).unwrap();
        assert_eq!((section.start, section.end), (1, 3));
    }

    #[test]
    fn test_edited_marker_is_malformed() {
        let commands = lines(&["  # RIGGER_DATA_BEGIN", "mount", TEAM_DATA_END]);
        assert!(find_section(&commands, SectionKind::TeamData).is_none());
    }

    #[test]
    fn test_strip_section_missing_end_is_untouched() {
        let mut commands = lines(&["echo x", TEAM_DATA_BEGIN, "mount /data"]);
        let before = commands.clone();
        assert!(strip_section(&mut commands, SectionKind::TeamData).is_none());
        assert_eq!(commands, before);
    }

    #[test]
    fn test_strip_multiple_kinds_shifts_indices() {
        let mut commands = lines(&[
            CUSTOM_STORAGE_BEGIN,
            "mount custom",
            CUSTOM_STORAGE_END,
            TEAM_DATA_BEGIN,
            "mount team",
            TEAM_DATA_END,
            "python train.py",
        ]);
        for kind in SectionKind::ALL {
            strip_section(&mut commands, kind);
        }
        assert_eq!(commands, lines(&["python train.py"]));
    }
}
