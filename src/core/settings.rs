//! # Settings Form State
//!
//! Values for every field on the settings page, plus which field has focus
//! and which section is highlighted. Defaults come from `catalog::SECTIONS`;
//! nothing here outlives the process.
//!
//! Fields are addressed by a flat index in document order so focus can move
//! across section boundaries with a single counter.

use log::debug;

use crate::core::catalog::{FieldKind, FieldSpec, SECTIONS, SectionId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Toggle(bool),
    /// Index into the field's options.
    Choice(usize),
    /// Buttons and read-only lines carry no value.
    Static,
}

impl FieldValue {
    fn initial(spec: &FieldSpec) -> Self {
        match spec.kind {
            FieldKind::Text { .. } => FieldValue::Text(String::new()),
            FieldKind::Toggle { default } => FieldValue::Toggle(default),
            FieldKind::Select { .. } => FieldValue::Choice(0),
            FieldKind::Info { .. } | FieldKind::Button { .. } => FieldValue::Static,
        }
    }
}

/// What pressing Enter on the focused field asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    Button { key: &'static str, label: &'static str },
    /// Enter inside a text input.
    Submit { key: &'static str },
}

#[derive(Debug, Clone, Copy)]
struct FieldRef {
    section: SectionId,
    spec: &'static FieldSpec,
}

pub struct SettingsState {
    fields: Vec<FieldRef>,
    values: Vec<FieldValue>,
    focused: usize,
    pub active_section: SectionId,
}

impl Default for SettingsState {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsState {
    pub fn new() -> Self {
        let fields: Vec<FieldRef> = SECTIONS
            .iter()
            .flat_map(|section| {
                section.fields.iter().map(move |spec| FieldRef {
                    section: section.id,
                    spec,
                })
            })
            .collect();
        let values = fields.iter().map(|f| FieldValue::initial(f.spec)).collect();
        let focused = fields
            .iter()
            .position(|f| f.spec.is_focusable())
            .unwrap_or(0);

        Self {
            fields,
            values,
            focused,
            active_section: SectionId::Profile,
        }
    }

    pub fn focused_index(&self) -> usize {
        self.focused
    }

    pub fn focused_spec(&self) -> &'static FieldSpec {
        self.fields[self.focused].spec
    }

    pub fn focused_section(&self) -> SectionId {
        self.fields[self.focused].section
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Flat index of `key`, if it exists.
    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.spec.key == key)
    }

    pub fn value(&self, key: &str) -> Option<&FieldValue> {
        self.index_of(key).map(|i| &self.values[i])
    }

    pub fn value_at(&self, index: usize) -> Option<&FieldValue> {
        self.values.get(index)
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        match self.value(key) {
            Some(FieldValue::Text(s)) => Some(s),
            _ => None,
        }
    }

    pub fn set_text(&mut self, key: &str, text: &str) {
        if let Some(i) = self.index_of(key)
            && let FieldValue::Text(s) = &mut self.values[i]
        {
            s.clear();
            s.push_str(text);
        }
    }

    pub fn focus_next(&mut self) {
        if let Some(i) = (self.focused + 1..self.fields.len()).find(|&i| self.fields[i].spec.is_focusable()) {
            self.focused = i;
        }
    }

    pub fn focus_prev(&mut self) {
        if let Some(i) = (0..self.focused).rev().find(|&i| self.fields[i].spec.is_focusable()) {
            self.focused = i;
        }
    }

    /// Move focus to the first field of `section` and highlight it.
    pub fn jump_to_section(&mut self, section: SectionId) {
        if let Some(i) = self
            .fields
            .iter()
            .position(|f| f.section == section && f.spec.is_focusable())
        {
            self.focused = i;
        }
        self.active_section = section;
        debug!("Settings jumped to #{}", section.anchor());
    }

    pub fn input_char(&mut self, c: char) {
        if let FieldValue::Text(s) = &mut self.values[self.focused] {
            s.push(c);
        }
    }

    pub fn input_str(&mut self, text: &str) {
        if let FieldValue::Text(s) = &mut self.values[self.focused] {
            s.extend(text.chars().filter(|c| !c.is_control()));
        }
    }

    pub fn backspace(&mut self) {
        if let FieldValue::Text(s) = &mut self.values[self.focused] {
            s.pop();
        }
    }

    /// Flip the focused toggle. Returns the new value.
    pub fn toggle(&mut self) -> Option<bool> {
        match &mut self.values[self.focused] {
            FieldValue::Toggle(on) => {
                *on = !*on;
                Some(*on)
            }
            _ => None,
        }
    }

    /// Step the focused select forward or back, wrapping around.
    pub fn cycle(&mut self, forward: bool) -> Option<&'static str> {
        let FieldKind::Select { options } = self.fields[self.focused].spec.kind else {
            return None;
        };
        let FieldValue::Choice(choice) = &mut self.values[self.focused] else {
            return None;
        };
        let len = options.len();
        if len == 0 {
            return None;
        }
        *choice = if forward {
            (*choice + 1) % len
        } else {
            (*choice + len - 1) % len
        };
        Some(options[*choice])
    }

    pub fn activate(&self) -> Option<Activation> {
        let spec = self.focused_spec();
        match spec.kind {
            FieldKind::Button { .. } => Some(Activation::Button {
                key: spec.key,
                label: spec.label,
            }),
            FieldKind::Text { .. } => Some(Activation::Submit { key: spec.key }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::{INVITE_EMAIL_KEY, SEND_INVITE_KEY};

    #[test]
    fn test_defaults_follow_catalog() {
        let state = SettingsState::new();
        assert_eq!(state.value("notifications.email"), Some(&FieldValue::Toggle(true)));
        assert_eq!(state.value("notifications.push"), Some(&FieldValue::Toggle(false)));
        assert_eq!(state.value("team.allow_invites"), Some(&FieldValue::Toggle(true)));
        assert_eq!(state.value("team.default_role"), Some(&FieldValue::Choice(0)));
        assert_eq!(state.text(INVITE_EMAIL_KEY), Some(""));
        assert_eq!(state.value("api.key"), Some(&FieldValue::Static));
        assert_eq!(state.focused_spec().key, "profile.first_name");
        assert_eq!(state.active_section, SectionId::Profile);
    }

    #[test]
    fn test_focus_skips_info_fields() {
        let mut state = SettingsState::new();
        state.jump_to_section(SectionId::Api);
        // api.key is read-only, so the section's first focus target is the button
        assert_eq!(state.focused_spec().key, "api.regenerate");
        state.focus_prev();
        assert_eq!(state.focused_spec().key, "appearance.accent");
    }

    #[test]
    fn test_focus_saturates_at_ends() {
        let mut state = SettingsState::new();
        state.focus_prev();
        assert_eq!(state.focused_spec().key, "profile.first_name");

        for _ in 0..state.field_count() + 5 {
            state.focus_next();
        }
        assert_eq!(state.focused_spec().key, "data.delete_account");
    }

    #[test]
    fn test_text_editing_only_on_text_fields() {
        let mut state = SettingsState::new();
        state.input_str("Jo\nhn");
        state.backspace();
        state.input_char('n');
        assert_eq!(state.text("profile.first_name"), Some("John"));

        state.jump_to_section(SectionId::Notifications);
        state.input_char('x');
        assert_eq!(state.value("notifications.email"), Some(&FieldValue::Toggle(true)));
    }

    #[test]
    fn test_toggle_and_cycle() {
        let mut state = SettingsState::new();
        state.jump_to_section(SectionId::Notifications);
        assert_eq!(state.toggle(), Some(false));
        assert_eq!(state.toggle(), Some(true));
        assert_eq!(state.cycle(true), None);

        state.jump_to_section(SectionId::Appearance);
        assert_eq!(state.cycle(false), Some("Auto"));
        assert_eq!(state.cycle(true), Some("Dark"));
        assert_eq!(state.cycle(true), Some("Light"));
        assert_eq!(state.toggle(), None);
    }

    #[test]
    fn test_activate() {
        let mut state = SettingsState::new();
        assert_eq!(
            state.activate(),
            Some(Activation::Submit { key: "profile.first_name" })
        );

        let send = state.index_of(SEND_INVITE_KEY).unwrap();
        while state.focused_index() < send {
            state.focus_next();
        }
        assert_eq!(
            state.activate(),
            Some(Activation::Button { key: SEND_INVITE_KEY, label: "Send Invite" })
        );

        state.jump_to_section(SectionId::Privacy);
        assert_eq!(state.activate(), None);
    }

    #[test]
    fn test_set_text_clears_and_replaces() {
        let mut state = SettingsState::new();
        state.set_text(INVITE_EMAIL_KEY, "a@b.com");
        assert_eq!(state.text(INVITE_EMAIL_KEY), Some("a@b.com"));
        state.set_text(INVITE_EMAIL_KEY, "");
        assert_eq!(state.text(INVITE_EMAIL_KEY), Some(""));
        // Non-text keys are left alone
        state.set_text("notifications.email", "x");
        assert_eq!(state.value("notifications.email"), Some(&FieldValue::Toggle(true)));
    }
}
