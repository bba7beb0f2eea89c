use crate::models::Intent;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntentRule {
    pub intent: Intent,
    pub triggers: Vec<String>,
}

impl IntentRule {
    pub fn new(intent: Intent, triggers: &[&str]) -> Self {
        Self {
            intent,
            triggers: triggers.iter().map(|t| t.to_lowercase()).collect(),
        }
    }

    fn matches(&self, lowered: &str) -> bool {
        contains_any(lowered, &self.triggers)
    }
}

/// Ordered keyword classifier. The first rule with any trigger contained in
/// the lowercased utterance wins; nothing matching yields `Intent::Default`.
#[derive(Debug, Clone)]
pub struct IntentClassifier {
    rules: Vec<IntentRule>,
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::with_rules(builtin_rules())
    }
}

impl IntentClassifier {
    pub fn with_rules(rules: Vec<IntentRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[IntentRule] {
        &self.rules
    }

    pub fn classify(&self, utterance: &str) -> Intent {
        let lowered = utterance.to_lowercase();
        if lowered.trim().is_empty() {
            return Intent::Default;
        }

        self.rules
            .iter()
            .find(|rule| rule.matches(&lowered))
            .map(|rule| rule.intent)
            .unwrap_or(Intent::Default)
    }
}

pub fn builtin_rules() -> Vec<IntentRule> {
    vec![
        IntentRule::new(
            Intent::Greeting,
            &["hello", "hi", "namaste", "नमस्ते", "নমস্কার"],
        ),
        IntentRule::new(Intent::Transport, &["transport", "bus", "train", "परिवहन"]),
        IntentRule::new(Intent::Guide, &["guide", "local", "गाइड"]),
        IntentRule::new(Intent::Festival, &["festival", "culture", "त्योहार"]),
        IntentRule::new(
            Intent::Accommodation,
            &["hotel", "stay", "accommodation", "होटल"],
        ),
        IntentRule::new(Intent::Adventure, &["adventure", "trek", "wildlife", "साहसिक"]),
        IntentRule::new(Intent::Food, &["food", "eat", "खाना"]),
        IntentRule::new(Intent::Weather, &["weather", "climate", "मौसम"]),
        IntentRule::new(Intent::Plan, &["plan", "itinerary", "योजना"]),
    ]
}

fn contains_any(input: &str, needles: &[String]) -> bool {
    needles.iter().any(|needle| input.contains(needle.as_str()))
}
