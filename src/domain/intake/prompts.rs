//! System-instruction templates for the generation service.
//!
//! Each supported language has a typed template record; completeness is a
//! compile-time property of the record type, so the runtime
//! missing-placeholder failure mode does not exist. Resolution for a
//! language with no catalog entry falls back to the default language
//! instead of failing the turn.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::domain::foundation::Language;

/// Named instruction slots for one language.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    /// Who the assistant is and what it may claim to do.
    pub role: &'static str,
    /// How to flag emergency symptoms.
    pub emergency: &'static str,
    /// Constraints on over-the-counter recommendations.
    pub otc_guidance: &'static str,
    /// The no-diagnosis rule.
    pub diagnostic_deferral: &'static str,
    /// Disclaimer opening the assessment.
    pub assessment_opening: &'static str,
    /// Disclaimer closing every assessment.
    pub assessment_closing: &'static str,
    /// Deflection for non-health topics.
    pub off_topic: &'static str,
}

impl PromptTemplate {
    /// Renders the full system instruction from the slots.
    pub fn render(&self) -> String {
        format!(
            "ROLE:\n{role}\n\n\
             SAFETY:\n- {emergency}\n- {deferral}\n- {otc}\n\n\
             ASSESSMENT FORMAT:\n- {opening}\n\
             - Keep responses under 120 words and ask one follow-up question at a time.\n\
             - When offering the user a discrete choice, end the reply with a marker \
             of the form [OPTIONS: first, second].\n\
             - {closing}\n\n\
             BOUNDARIES:\n- {off_topic}",
            role = self.role,
            emergency = self.emergency,
            deferral = self.diagnostic_deferral,
            otc = self.otc_guidance,
            opening = self.assessment_opening,
            closing = self.assessment_closing,
            off_topic = self.off_topic,
        )
    }
}

/// Per-language catalog of prompt templates.
#[derive(Debug)]
pub struct PromptCatalog {
    templates: HashMap<Language, PromptTemplate>,
}

static STANDARD: Lazy<PromptCatalog> = Lazy::new(|| {
    let mut templates = HashMap::new();

    templates.insert(
        Language::En,
        PromptTemplate {
            role: "You are MediPulse, an AI medical assistant providing preliminary \
                   health information only. Never diagnose or replace professional \
                   medical advice.",
            emergency: "Immediately flag emergency symptoms with: \"Seek emergency \
                        care if you experience: [specific symptoms]\".",
            otc_guidance: "Never suggest prescription medications. For over-the-counter \
                           recommendations, specify exact dosage (e.g. \"500mg \
                           acetaminophen every 6-8 hours\") and add: \"Consult a \
                           pharmacist for proper use\".",
            diagnostic_deferral: "Offer at most 1-3 possible conditions and always defer \
                                  the diagnosis to a licensed physician.",
            assessment_opening: "Open the assessment by noting it is preliminary \
                                 information based on what the user reported.",
            assessment_closing: "Close every assessment with: \"This is informational \
                                 only. Always consult a licensed physician.\"",
            off_topic: "Only discuss health-related topics. For anything else reply: \
                        \"I specialize in health questions only.\"",
        },
    );

    templates.insert(
        Language::Ar,
        PromptTemplate {
            role: "أنت ميدي بالس، مساعد طبي ذكي يقدم معلومات صحية أولية فقط. \
                   لا تشخّص الحالات ولا تحل محل المشورة الطبية المتخصصة. أجب دائمًا \
                   باللغة العربية.",
            emergency: "نبّه فورًا إلى أعراض الطوارئ بعبارة: \"اطلب الرعاية الطارئة إذا \
                        شعرت بـ: [الأعراض المحددة]\".",
            otc_guidance: "لا تقترح أدوية تستلزم وصفة طبية. عند التوصية بدواء متاح دون \
                           وصفة حدّد الجرعة بدقة وأضف: \"استشر الصيدلي للاستخدام \
                           الصحيح\".",
            diagnostic_deferral: "اذكر من حالة إلى ثلاث حالات محتملة على الأكثر واترك \
                                  التشخيص دائمًا لطبيب مرخّص.",
            assessment_opening: "ابدأ التقييم بالإشارة إلى أنه معلومات أولية مبنية على \
                                 ما ذكره المستخدم.",
            assessment_closing: "اختم كل تقييم بعبارة: \"هذه معلومات إرشادية فقط. راجع \
                                 طبيبًا مرخّصًا دائمًا.\"",
            off_topic: "ناقش المواضيع الصحية فقط. لغير ذلك أجب: \"أنا مختص بالأسئلة \
                        الصحية فقط.\"",
        },
    );

    PromptCatalog { templates }
});

impl PromptCatalog {
    /// The built-in catalog covering all supported languages.
    pub fn standard() -> &'static PromptCatalog {
        &STANDARD
    }

    /// Resolves the template for a language, falling back to the default
    /// language when the catalog has no entry for it.
    pub fn resolve(&self, language: Language) -> &PromptTemplate {
        self.templates.get(&language).unwrap_or_else(|| {
            tracing::warn!(language = %language, "no prompt template; falling back to default");
            &self.templates[&Language::default()]
        })
    }

    /// Checks that every supported language has a template.
    ///
    /// Run once at startup; a gap here is a build defect, not a runtime
    /// condition.
    pub fn validate(&self) -> Result<(), Vec<Language>> {
        let missing: Vec<Language> = Language::ALL
            .iter()
            .copied()
            .filter(|l| !self.templates.contains_key(l))
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(missing)
        }
    }

    /// The fixed instruction used for the end-of-conversation summary.
    pub fn summary_instruction(language: Language) -> &'static str {
        match language {
            Language::En => {
                "Summarize this health intake conversation for the user: the \
                 information they provided, the guidance given, and any follow-up \
                 that was recommended. Keep it under 150 words and close with: \
                 \"This is informational only. Always consult a licensed physician.\""
            }
            Language::Ar => {
                "لخّص محادثة الاستقبال الصحي هذه للمستخدم: المعلومات التي قدّمها، \
                 والإرشادات المقدمة، وأي متابعة موصى بها. لا تتجاوز 150 كلمة واختم \
                 بعبارة: \"هذه معلومات إرشادية فقط. راجع طبيبًا مرخّصًا دائمًا.\""
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_covers_all_supported_languages() {
        assert!(PromptCatalog::standard().validate().is_ok());
    }

    #[test]
    fn rendered_prompt_contains_every_slot() {
        let template = PromptCatalog::standard().resolve(Language::En);
        let rendered = template.render();

        assert!(rendered.contains("MediPulse"));
        assert!(rendered.contains("Seek emergency care"));
        assert!(rendered.contains("Consult a pharmacist"));
        assert!(rendered.contains("licensed physician"));
        assert!(rendered.contains("[OPTIONS: first, second]"));
        assert!(rendered.contains("health questions only"));
    }

    #[test]
    fn arabic_template_renders_arabic_text() {
        let template = PromptCatalog::standard().resolve(Language::Ar);
        assert!(template.render().contains("ميدي بالس"));
    }

    #[test]
    fn summary_instruction_is_localized() {
        assert!(PromptCatalog::summary_instruction(Language::En).contains("Summarize"));
        assert!(PromptCatalog::summary_instruction(Language::Ar).contains("لخّص"));
    }
}
