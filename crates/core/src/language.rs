use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

use thiserror::Error;

use crate::models::{normalize_language_code, Intent, DEFAULT_LANGUAGE};

#[derive(Debug, Error)]
pub enum LanguagePackError {
    #[error("language pack `{0}` has no default response")]
    MissingDefault(String),
    #[error("language pack `{code}` uses unknown intent key `{key}`")]
    UnknownIntent { code: String, key: String },
    #[error("an `en` language pack is required")]
    MissingEnglish,
    #[error("language pack key `{0}` has no language code")]
    EmptyCode(String),
    #[error("language pack `{code}` is defined more than once")]
    DuplicateCode { code: String },
    #[error("failed to read language packs from {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse language packs: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Canned replies for one language. The default reply is required at
/// construction, every other intent is optional.
#[derive(Debug, Clone)]
pub struct LanguagePack {
    code: String,
    default_text: String,
    entries: HashMap<Intent, String>,
}

impl LanguagePack {
    pub fn new(code: &str, default_text: impl Into<String>) -> Result<Self, LanguagePackError> {
        let code = normalize_language_code(Some(code));
        let default_text = default_text.into();
        if default_text.trim().is_empty() {
            return Err(LanguagePackError::MissingDefault(code));
        }

        Ok(Self {
            code,
            default_text,
            entries: HashMap::new(),
        })
    }

    pub fn with(mut self, intent: Intent, text: impl Into<String>) -> Self {
        let text = text.into();
        match intent {
            Intent::Default if !text.trim().is_empty() => self.default_text = text,
            Intent::Default => {}
            _ if text.trim().is_empty() => {}
            _ => {
                self.entries.insert(intent, text);
            }
        }
        self
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn get(&self, intent: Intent) -> Option<&str> {
        match intent {
            Intent::Default => Some(self.default_text.as_str()),
            _ => self.entries.get(&intent).map(String::as_str),
        }
    }

    pub fn default_text(&self) -> &str {
        &self.default_text
    }

    fn from_raw(code: &str, raw: BTreeMap<String, String>) -> Result<Self, LanguagePackError> {
        let mut default_text = None;
        let mut entries = Vec::new();

        for (key, text) in raw {
            let intent = Intent::parse(&key).ok_or_else(|| LanguagePackError::UnknownIntent {
                code: code.to_string(),
                key: key.clone(),
            })?;
            if intent == Intent::Default {
                default_text = Some(text);
            } else {
                entries.push((intent, text));
            }
        }

        let default_text =
            default_text.ok_or_else(|| LanguagePackError::MissingDefault(code.to_string()))?;
        let pack = Self::new(code, default_text)?;
        Ok(entries
            .into_iter()
            .fold(pack, |pack, (intent, text)| pack.with(intent, text)))
    }
}

/// Which pack a resolved reply came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub text: String,
    pub language: String,
}

/// Immutable set of language packs, built once at startup.
#[derive(Debug, Clone)]
pub struct LanguagePackRegistry {
    packs: HashMap<String, LanguagePack>,
}

impl LanguagePackRegistry {
    pub fn new(packs: Vec<LanguagePack>) -> Result<Self, LanguagePackError> {
        let packs = packs
            .into_iter()
            .map(|pack| (pack.code.clone(), pack))
            .collect::<HashMap<_, _>>();

        if !packs.contains_key(DEFAULT_LANGUAGE) {
            return Err(LanguagePackError::MissingEnglish);
        }

        Ok(Self { packs })
    }

    pub fn builtin() -> Self {
        Self {
            packs: builtin_packs()
                .into_iter()
                .map(|pack| (pack.code.clone(), pack))
                .collect(),
        }
    }

    /// Builtin packs with packs from a JSON file layered on top. A pack in the
    /// file replaces the builtin pack with the same code.
    pub fn with_overrides(path: impl AsRef<Path>) -> Result<Self, LanguagePackError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| LanguagePackError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::builtin().merge_json(&raw)
    }

    pub fn merge_json(self, raw: &str) -> Result<Self, LanguagePackError> {
        let parsed: BTreeMap<String, BTreeMap<String, String>> = serde_json::from_str(raw)?;
        let mut packs = self.packs;
        let mut seen = HashSet::new();
        for (code, entries) in parsed {
            let primary = code.trim().split(['-', '_']).next().unwrap_or_default();
            if primary.is_empty() {
                return Err(LanguagePackError::EmptyCode(code));
            }
            let pack = LanguagePack::from_raw(&code, entries)?;
            if !seen.insert(pack.code.clone()) {
                return Err(LanguagePackError::DuplicateCode { code: pack.code });
            }
            packs.insert(pack.code.clone(), pack);
        }
        Self::new(packs.into_values().collect())
    }

    pub fn languages(&self) -> Vec<String> {
        let mut codes = self.packs.keys().cloned().collect::<Vec<_>>();
        codes.sort();
        codes
    }

    pub fn has_language(&self, code: &str) -> bool {
        self.packs.contains_key(&normalize_language_code(Some(code)))
    }

    pub fn resolve(&self, intent: Intent, language: &str) -> String {
        self.resolve_with_source(intent, language).text
    }

    /// Lookup order: requested pack, then the `en` entry for the same intent,
    /// then the `en` default reply.
    pub fn resolve_with_source(&self, intent: Intent, language: &str) -> Resolution {
        let code = normalize_language_code(Some(language));

        if let Some(text) = self.packs.get(&code).and_then(|pack| pack.get(intent)) {
            return Resolution {
                text: text.to_string(),
                language: code,
            };
        }

        let english = self.english();
        let text = english
            .get(intent)
            .unwrap_or_else(|| english.default_text())
            .to_string();
        Resolution {
            text,
            language: english.code.clone(),
        }
    }

    fn english(&self) -> &LanguagePack {
        // `new` and `builtin` both guarantee the entry exists.
        &self.packs[DEFAULT_LANGUAGE]
    }
}

impl Default for LanguagePackRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

fn builtin_packs() -> Vec<LanguagePack> {
    let english = LanguagePack {
        code: "en".to_string(),
        default_text: "I'm here to help you explore Jharkhand! I can assist with transportation, accommodation, local guides, cultural experiences, adventure activities, and trip planning. What would you like to know more about?".to_string(),
        entries: HashMap::new(),
    }
    .with(
        Intent::Greeting,
        "Hello! Welcome to Jharkhand Tourism Assistant. How can I help you explore the beautiful state of Jharkhand? 🌿",
    )
    .with(
        Intent::Transport,
        "I can help you with transportation in Jharkhand! We have buses, trains, and private cabs available. The main railway stations are Ranchi, Dhanbad, and Jamshedpur. Would you like me to check availability for specific routes?",
    )
    .with(
        Intent::Guide,
        "Great! I can connect you with experienced local guides who know Jharkhand's hidden gems. We have cultural guides, adventure guides, and tribal heritage specialists. What type of experience are you looking for?",
    )
    .with(
        Intent::Festival,
        "Jharkhand has amazing festivals! Sarhul (spring festival), Karma (harvest festival), and Sohrai (tribal art festival) are the most popular. The best time to visit depends on which cultural experience you want. Would you like details about upcoming festivals?",
    )
    .with(
        Intent::Accommodation,
        "I can help you find perfect accommodation! From luxury resorts in Ranchi to eco-lodges near Betla National Park. What's your budget and preferred location?",
    )
    .with(
        Intent::Adventure,
        "Adventure awaits in Jharkhand! Betla National Park for wildlife, Netarhat for trekking, and Hundru Falls for scenic beauty. Rock climbing at Ranchi Rock Garden is also popular. What type of adventure interests you?",
    )
    .with(
        Intent::Food,
        "Jharkhand cuisine is delicious! Try Dhuska (rice pancakes), Pitha (rice cakes), and tribal delicacies like Handia (rice beer). I can recommend authentic restaurants and food experiences. Any specific dietary preferences?",
    )
    .with(
        Intent::Weather,
        "Jharkhand has a pleasant climate! Best time to visit is October to March (cool and dry). Monsoon (June-September) is great for waterfalls but can be challenging for travel. Summer (April-May) is hot but good for indoor cultural activities.",
    )
    .with(
        Intent::Plan,
        "I'd love to help plan your Jharkhand trip! To create the perfect itinerary, I need to know: How many days do you have? What interests you most - culture, adventure, wildlife, or relaxation? Any specific places you want to visit?",
    );

    let hindi = LanguagePack {
        code: "hi".to_string(),
        default_text: "मैं झारखंड की खोज में आपकी सहायता के लिए यहाँ हूँ! परिवहन, आवास, स्थानीय गाइड, सांस्कृतिक अनुभव और यात्रा योजना के बारे में पूछें।".to_string(),
        entries: HashMap::new(),
    }
    .with(
        Intent::Greeting,
        "नमस्ते! झारखंड पर्यटन सहायक में आपका स्वागत है। मैं झारखंड राज्य की खोज में आपकी कैसे सहायता कर सकता हूँ? 🌿",
    )
    .with(
        Intent::Transport,
        "मैं झारखंड में परिवहन के साथ आपकी सहायता कर सकता हूँ! हमारे पास बसें, ट्रेनें और निजी कैब उपलब्ध हैं। मुख्य रेलवे स्टेशन रांची, धनबाद और जमशेदपुर हैं।",
    )
    .with(
        Intent::Guide,
        "बहुत बढ़िया! मैं आपको अनुभवी स्थानीय गाइड से जोड़ सकता हूँ जो झारखंड के छुपे हुए रत्नों को जानते हैं। आप किस प्रकार का अनुभव चाहते हैं?",
    )
    .with(
        Intent::Festival,
        "झारखंड में अद्भुत त्योहार हैं! सरहुल (वसंत त्योहार), कर्मा (फसल त्योहार), और सोहराई (आदिवासी कला त्योहार) सबसे लोकप्रिय हैं।",
    );

    let bengali = LanguagePack {
        code: "bn".to_string(),
        default_text: "আমি ঝাড়খণ্ড অন্বেষণে আপনাকে সাহায্য করার জন্য এখানে আছি! পর্যটন স্থান, ভ্রমণ পরিকল্পনা বা স্থানীয় তথ্য সম্পর্কে জিজ্ঞাসা করুন।".to_string(),
        entries: HashMap::new(),
    }
    .with(
        Intent::Greeting,
        "নমস্কার! ঝাড়খণ্ড পর্যটন সহায়কে আপনাকে স্বাগতম। ঝাড়খণ্ড রাজ্যের অন্বেষণে আমি কীভাবে সাহায্য করতে পারি? 🌿",
    )
    .with(
        Intent::Festival,
        "ঝাড়খণ্ড উপজাতীয় সংস্কৃতি ও ঐতিহ্যে সমৃদ্ধ: উপজাতীয় নৃত্য পরিবেশনা, ঐতিহ্যবাহী হস্তশিল্প কর্মশালা এবং স্থানীয় উৎসব ও মেলা।",
    );

    vec![english, hindi, bengali]
}
