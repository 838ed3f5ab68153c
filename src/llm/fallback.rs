use std::time::Duration;
use log::debug;
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Greeting,
    Agriculture,
    Healthcare,
    Education,
    Automation,
    Regional,
    General,
}

struct Rule {
    category: Category,
    keywords: &'static [&'static str],
    reply: &'static str,
}

// Checked top to bottom; the first rule with a matching keyword wins.
const RULES: &[Rule] = &[
    Rule {
        category: Category::Greeting,
        keywords: &["hello", "hi"],
        reply: "Hello! I'm AutoSphere AI, your intelligent automation assistant. How can I help you today?",
    },
    Rule {
        category: Category::Agriculture,
        keywords: &["agriculture", "farming"],
        reply: "I can help you with agriculture automation solutions! This includes crop monitoring, yield prediction, irrigation management, and precision farming techniques. Would you like to know more about any specific aspect?",
    },
    Rule {
        category: Category::Healthcare,
        keywords: &["healthcare", "medical"],
        reply: "For healthcare automation, I can assist with patient data management, appointment scheduling, medical record analysis, and diagnostic support systems. What specific healthcare automation are you interested in?",
    },
    Rule {
        category: Category::Education,
        keywords: &["education", "learning"],
        reply: "Education automation can include personalized learning paths, automated grading, content generation, and student progress tracking. How can I help you implement educational technology solutions?",
    },
    Rule {
        category: Category::Automation,
        keywords: &["automation", "workflow"],
        reply: "I specialize in end-to-end workflow automation! I can help you identify automation opportunities, design efficient processes, and implement solutions that save time and reduce costs. What workflow would you like to optimize?",
    },
    Rule {
        category: Category::Regional,
        keywords: &["india", "indian"],
        reply: "As an India-centric AI platform, I'm designed to address local challenges and opportunities. I can help with solutions tailored for Indian markets, including language support, cultural considerations, and local regulatory compliance.",
    },
];

const GENERAL_REPLY: &str =
    "Thank you for your message! I'm AutoSphere AI, designed to help with automation, assistance, and achievement. I can help with agriculture, healthcare, education, and general workflow optimization. What would you like to explore?";

pub fn classify(message: &str) -> Category {
    let lower = message.to_lowercase();
    RULES.iter()
        .find(|rule| rule.keywords.iter().any(|kw| lower.contains(kw)))
        .map(|rule| rule.category)
        .unwrap_or(Category::General)
}

pub fn reply_for(category: Category) -> &'static str {
    RULES.iter()
        .find(|rule| rule.category == category)
        .map(|rule| rule.reply)
        .unwrap_or(GENERAL_REPLY)
}

/// Offline responder used while the backend has never been reachable.
#[derive(Debug, Clone)]
pub struct LocalResponder {
    min_delay: Duration,
    max_delay: Duration,
}

impl Default for LocalResponder {
    fn default() -> Self {
        Self::new(Duration::from_millis(1000), Duration::from_millis(3000))
    }
}

impl LocalResponder {
    pub fn new(min_delay: Duration, max_delay: Duration) -> Self {
        let max_delay = max_delay.max(min_delay);
        Self { min_delay, max_delay }
    }

    pub fn instant() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    /// Canned reply for `message`, without the simulated latency.
    pub fn reply(&self, message: &str) -> &'static str {
        reply_for(classify(message))
    }

    pub async fn respond(&self, message: &str) -> String {
        let delay = self.pick_delay();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        let category = classify(message);
        debug!("Fallback reply category {:?} after {:?}", category, delay);
        reply_for(category).to_string()
    }

    fn pick_delay(&self) -> Duration {
        if self.min_delay == self.max_delay {
            return self.min_delay;
        }
        let min = self.min_delay.as_millis() as u64;
        let max = self.max_delay.as_millis() as u64;
        Duration::from_millis(rand::thread_rng().gen_range(min..=max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_follow_priority_order() {
        assert_eq!(classify("Hello there"), Category::Greeting);
        assert_eq!(classify("farming tips"), Category::Agriculture);
        assert_eq!(classify("MEDICAL records"), Category::Healthcare);
        assert_eq!(classify("education tools"), Category::Education);
        assert_eq!(classify("workflow design"), Category::Automation);
        assert_eq!(classify("Indian market"), Category::Regional);
        assert_eq!(classify("tell me a joke"), Category::General);
    }

    #[test]
    fn earlier_category_wins_when_several_match() {
        // "healthcare" and "automation" both match; healthcare ranks higher.
        assert_eq!(classify("healthcare automation"), Category::Healthcare);
        // "hi" is a substring of "machine", so the greeting rule fires.
        assert_eq!(classify("machine workflow"), Category::Greeting);
    }

    #[test]
    fn replies_are_deterministic() {
        let responder = LocalResponder::instant();
        assert_eq!(responder.reply("hello"), responder.reply("hello"));
        assert!(responder.reply("hello").starts_with("Hello! I'm AutoSphere AI"));
        assert_eq!(responder.reply("xyz"), GENERAL_REPLY);
    }

    #[test]
    fn inverted_delay_range_is_clamped() {
        let responder = LocalResponder::new(Duration::from_millis(50), Duration::from_millis(10));
        assert_eq!(responder.pick_delay(), Duration::from_millis(50));
    }

    #[tokio::test]
    async fn respond_matches_pure_reply() {
        let responder = LocalResponder::instant();
        assert_eq!(responder.respond("agriculture").await, reply_for(Category::Agriculture));
    }

    #[tokio::test(start_paused = true)]
    async fn respond_waits_simulated_latency() {
        let responder = LocalResponder::new(Duration::from_millis(200), Duration::from_millis(200));
        let started = tokio::time::Instant::now();
        responder.respond("hi").await;
        assert!(started.elapsed() >= Duration::from_millis(200));
    }
}
