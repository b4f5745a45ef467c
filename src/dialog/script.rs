//! Booking dialog script
//!
//! A script is an ordered, immutable sequence of steps. Each step carries an
//! identifier, an optional expected slot kind, and per-language prompt text.
//! Exactly one step has no expected slot and it is the last one (the
//! templated confirmation).

use std::collections::HashMap;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_LANG;

/// Structured slot kinds, each with its own extractor dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlotKind {
    People,
    Time,
}

impl SlotKind {
    /// Slot name used as the key in the session slot map.
    pub fn slot_name(&self) -> &'static str {
        match self {
            SlotKind::People => "people",
            SlotKind::Time => "time",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Step {
    pub id: String,
    pub expect: Option<SlotKind>,
    prompts: HashMap<String, String>,
}

impl Step {
    pub fn new(
        id: impl Into<String>,
        expect: Option<SlotKind>,
        prompts: &[(&str, &str)],
    ) -> Self {
        Self {
            id: id.into(),
            expect,
            prompts: prompts
                .iter()
                .map(|(l, p)| (l.to_string(), p.to_string()))
                .collect(),
        }
    }

    /// Prompt text for `lang`, falling back to the default language.
    pub fn prompt(&self, lang: &str) -> &str {
        self.prompts
            .get(lang)
            .or_else(|| self.prompts.get(DEFAULT_LANG))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Render the prompt with `{slot}` placeholders substituted.
    pub fn render(&self, lang: &str, slots: &HashMap<String, String>) -> String {
        let mut text = self.prompt(lang).to_string();
        for (name, value) in slots {
            text = text.replace(&format!("{{{name}}}"), value);
        }
        text
    }
}

#[derive(Debug, Clone)]
pub struct Script {
    steps: Vec<Step>,
}

impl Script {
    pub fn new(steps: Vec<Step>) -> Result<Self> {
        let script = Self { steps };
        script.validate()?;
        Ok(script)
    }

    /// Exactly one step may lack an expected slot, and it must be the last.
    fn validate(&self) -> Result<()> {
        if self.steps.is_empty() {
            bail!("script must have at least one step");
        }
        let slotless = self.steps.iter().filter(|s| s.expect.is_none()).count();
        if slotless != 1 {
            bail!("script must have exactly one step without an expected slot, found {slotless}");
        }
        if self.steps.last().map(|s| s.expect.is_some()).unwrap_or(true) {
            bail!("the step without an expected slot must be the last step");
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn step(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    pub fn last_step(&self) -> &Step {
        // Non-empty by construction.
        self.steps.last().expect("script validated as non-empty")
    }

    /// The builtin restaurant booking script: party size, time, confirmation.
    pub fn restaurant_booking() -> Self {
        let steps = vec![
            Step::new(
                "ask_people",
                Some(SlotKind::People),
                &[
                    ("en", "How many people are you booking for?"),
                    ("ru", "На сколько человек вы хотите забронировать?"),
                    ("fr", "Pour combien de personnes souhaitez-vous réserver?"),
                    ("es", "¿Para cuántas personas desea reservar?"),
                    ("de", "Für wie viele Personen möchten Sie reservieren?"),
                    ("ca", "Per a quantes persones vols fer la reserva?"),
                ],
            ),
            Step::new(
                "ask_time",
                Some(SlotKind::Time),
                &[
                    ("en", "What time would you like the reservation?"),
                    ("ru", "На какое время вы хотите забронировать?"),
                    ("fr", "À quelle heure souhaitez-vous réserver?"),
                    ("es", "¿A qué hora desea reservar?"),
                    ("de", "Um wie viel Uhr möchten Sie reservieren?"),
                    ("ca", "A quina hora vols fer la reserva?"),
                ],
            ),
            Step::new(
                "confirm",
                None,
                &[
                    (
                        "en",
                        "Great, I've booked a table for {people} at {time}. Bon appétit!",
                    ),
                    (
                        "ru",
                        "Отлично, я забронировал столик на {people} в {time}. Приятного аппетита!",
                    ),
                    (
                        "fr",
                        "Parfait, j'ai réservé une table pour {people} à {time}. Bon appétit!",
                    ),
                    (
                        "es",
                        "Genial, he reservado una mesa para {people} a las {time}. ¡Buen provecho!",
                    ),
                    (
                        "de",
                        "Super, ich habe einen Tisch für {people} um {time} reserviert. Guten Appetit!",
                    ),
                    (
                        "ca",
                        "Genial! T'he reservat una taula per a {people} a les {time}. Bon profit!",
                    ),
                ],
            ),
        ];
        Self::new(steps).expect("builtin booking script is valid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_script_shape() {
        let script = Script::restaurant_booking();
        assert_eq!(script.len(), 3);
        assert_eq!(script.step(0).unwrap().expect, Some(SlotKind::People));
        assert_eq!(script.step(1).unwrap().expect, Some(SlotKind::Time));
        assert_eq!(script.last_step().expect, None);
    }

    #[test]
    fn test_prompt_falls_back_to_default_language() {
        let script = Script::restaurant_booking();
        let step = script.step(0).unwrap();
        assert_eq!(step.prompt("xx"), step.prompt("en"));
        assert!(step.prompt("ca").contains("reserva"));
    }

    #[test]
    fn test_render_substitutes_slots() {
        let script = Script::restaurant_booking();
        let slots = HashMap::from([
            ("people".to_string(), "4".to_string()),
            ("time".to_string(), "19:00".to_string()),
        ]);
        let text = script.last_step().render("en", &slots);
        assert_eq!(text, "Great, I've booked a table for 4 at 19:00. Bon appétit!");
    }

    #[test]
    fn test_validation_rejects_slotless_middle_step() {
        let steps = vec![
            Step::new("a", None, &[("en", "x")]),
            Step::new("b", Some(SlotKind::Time), &[("en", "y")]),
        ];
        assert!(Script::new(steps).is_err());
    }

    #[test]
    fn test_validation_requires_one_terminal_step() {
        let steps = vec![
            Step::new("a", Some(SlotKind::People), &[("en", "x")]),
            Step::new("b", Some(SlotKind::Time), &[("en", "y")]),
        ];
        assert!(Script::new(steps).is_err());
    }
}
