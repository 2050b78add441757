use chrono::Utc;
use feynman_flip::classifier::{classify, extract_question, Turn};
use feynman_flip::coach::{plan, render, Coach};
use feynman_flip::prompts::{FEEDBACK_IDENTIFY_GAPS, GREETING_TEMPLATES};
use feynman_flip::selector::prefix;
use feynman_flip::{Category, Message, TopicView};

#[test]
fn test_first_greeting_names_topic() {
    let mut coach = Coach::seeded(1);
    let reply = coach.reply(&TopicView::new("Entropy", 0), "你好", &[]);
    assert_eq!(reply.category, Category::Greeting);
    assert!(reply.content.contains("Entropy"));
    let rendered: Vec<String> = GREETING_TEMPLATES.iter().map(|t| render(t, "Entropy", "")).collect();
    assert!(rendered.contains(&reply.content));
}

#[test]
fn test_greeting_wins_regardless_of_length() {
    let long = format!("你好，{}？", "熵".repeat(200));
    assert_eq!(classify(&Turn::new(&long, 1)), Category::Greeting);
    assert_ne!(classify(&Turn::new(&long, 2)), Category::Greeting);
}

#[test]
fn test_long_question_is_long_explanation_unless_method() {
    let long = format!("{}？", "熵".repeat(120));
    assert_eq!(classify(&Turn::new(&long, 3)), Category::LongExplanation);
    let method = format!("费曼{}？", "熵".repeat(120));
    assert_eq!(classify(&Turn::new(&method, 3)), Category::MethodInquiry);
}

#[test]
fn test_question_extraction() {
    assert_eq!(extract_question("这是真的吗？"), "这是真的吗");
    assert_eq!(classify(&Turn::new("这是真的吗？", 3)), Category::Question);
}

#[test]
fn test_long_explanation_offers_gap_prompt() {
    let message = "熵".repeat(150);
    let plan = plan(&TopicView::new("Entropy", 2), &message);
    assert_eq!(plan.category, Category::LongExplanation);
    assert!(plan.candidates.contains(&render(FEEDBACK_IDENTIFY_GAPS, "Entropy", "")));
}

#[test]
fn test_consecutive_replies_rarely_repeat() {
    let topic = TopicView::new("Entropy", 4);
    for (seed, message) in [(3_u64, "好的".to_string()), (4, "熵".repeat(150))] {
        let mut coach = Coach::seeded(seed);
        let mut previous = coach.respond(&topic, &message, &[]);
        let mut differ = 0;
        for _ in 0..1000 {
            let log = vec![Message::user(message.clone(), Utc::now()), Message::assistant(previous.clone(), Utc::now())];
            let next = coach.respond(&topic, &message, &log);
            if prefix(&next) != prefix(&previous) {
                differ += 1;
            }
            previous = next;
        }
        assert!(differ >= 900, "only {differ} of 1000 differed for {message}");
    }
}
