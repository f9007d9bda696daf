use crate::domain::model::BusinessDescription;

const KEYWORDS_INSTRUCTION: &str = "You will generate search keywords for potential B2B clients. \
The user will describe their business; analyze who their potential clients are. \
Write each keyword (a potential client category) the way you would type it into a Google Maps search. \
DO NOT add anything else, only the keywords. Format the output as a list of keywords, one per line.";

const VALIDATION_INSTRUCTION: &str = "You are a business advisor and will be given a description of a business. \
Decide whether the description is good enough for a marketing strategy to be built on it; \
this mostly comes down to a unique selling point. \
If the description is good enough, respond with exactly \"OK\". \
If not, respond with one short suggestion of what to add to the description. \
Do not be too critical: if anything is unique and marketable, it is good enough. \
Give only one suggestion and never say anything like \"NOT OK\", just the suggestion.";

const STRATEGY_INSTRUCTION: &str = r#"You are a marketing consultant who helps businesses reach potential clients through WhatsApp chat.

Customers move through a funnel (awareness, consideration, conversion, loyalty, advocacy). Focus only on the first three stages: awareness, consideration and conversion.

Following the Rule of 7, people need to see a product or service at least seven times before they decide to use or buy it. Write 7 messages, one per stage: awareness, interest, consideration, re-education, case study, reminder and engagement. Keep each message neither too long nor too short, interesting enough to be read to the end, and not too formal. Never use placeholders for information you do not have; work only with the data you are given.

Output only the result, in exactly this structure and nothing else:
Message 1: `the message`
Message 2: `the message`
Message 3: `the message`
Message 4: `the message`
Message 5: `the message`
Message 6: `the message`
Message 7: `the message`"#;

pub fn potential_clients_prompt(description: &BusinessDescription) -> String {
    format!(
        "System Instruction: {}\n\nUser Business Description: {}",
        KEYWORDS_INSTRUCTION,
        description.as_str()
    )
}

pub fn validation_prompt(description: &BusinessDescription) -> String {
    format!(
        "System Instruction: {}\n\nBusiness Description: {}",
        VALIDATION_INSTRUCTION,
        description.as_str()
    )
}

pub fn marketing_strategy_prompt(description: &BusinessDescription) -> String {
    format!(
        "System Instruction: {}\n\nBusiness Description (write the messages in the same language as this description): {}",
        STRATEGY_INSTRUCTION,
        description.as_str()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompts_embed_description() {
        let description = BusinessDescription::parse("Kami menjual kopi susu").unwrap();

        for prompt in [
            potential_clients_prompt(&description),
            validation_prompt(&description),
            marketing_strategy_prompt(&description),
        ] {
            assert!(prompt.starts_with("System Instruction: "));
            assert!(prompt.ends_with("Kami menjual kopi susu"));
        }
    }

    #[test]
    fn test_strategy_prompt_lists_seven_labels() {
        let description = BusinessDescription::parse("Bakery").unwrap();
        let prompt = marketing_strategy_prompt(&description);
        for n in 1..=7 {
            assert!(prompt.contains(&format!("Message {}:", n)));
        }
        assert!(prompt.contains("same language"));
    }
}
