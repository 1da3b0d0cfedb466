//! Prompt templates for the two report passes.

use sp_core::ArticleDigest;

/// Pass 1: reduce the raw article dump to categorized insights.
pub fn cleaning_prompt(articles: &[ArticleDigest]) -> String {
    let dataset = serde_json::to_string(articles).unwrap_or_else(|_| "[]".to_string());
    format!(
        r#"I have a dataset of articles containing titles, content, and sources. The articles cover various topics, but I want to extract only **the most important insights** relevant to the following categories:

1. **Startup News** - New startups, funding rounds, acquisitions, IPOs, and significant product launches.
2. **Emerging Trends** - Growing industries, breakthrough technologies, and evolving business models.
3. **Investment Opportunities** - Undervalued sectors, upcoming IPOs, and industries gaining investor attention.
4. **Market Gaps & Problems to Solve** - Pain points in industries that present opportunities for new businesses or products.
5. **Potential Mistakes & Risks to Avoid** - Failures, regulatory challenges, or strategic errors that entrepreneurs should be aware of.

### Instructions:
- Identify key takeaways from each article that match the categories above.
- Summarize findings in a clear, concise, and structured format.
- Remove irrelevant information (general news, unrelated politics, non-actionable insights).
- Maintain the original source for credibility.
- For each article, identify up to 3 trend tags from: ["AI agents", "Web3", "quantum computing", "sustainable tech", "remote work tools", "fintech", "healthtech"] and include them in the output JSON.

### Output Format Example:
[
  {{
    "title": "Example Title",
    "content": "Summary of insight",
    "source": "Source URL",
    "tags": ["AI agents", "fintech"]
  }}
]

Here is the dataset in json format:
{dataset}"#
    )
}

/// Pass 2: compose the final HTML report from the cleaned insights.
pub fn composition_prompt(cleaned: &str) -> String {
    format!(
        r#"Context:
You are analyzing a curated and cleaned dataset containing key insights extracted from articles across domains like startups, funding, acquisitions, tech innovation, business models, emerging trends, market gaps, and investment news.

Objective:
Generate a structured and strategically actionable HTML report with deep insight density, written for founders, operators, and VCs who want to make moves in the next 30-90 days.

Instructions:
1. Analyze the data to uncover underlying trends, strategic risks, emerging sectors, and capital-efficient business opportunities.
2. Each bullet point should be a mini-analysis limited to 3-4 sentences.
3. Frame each insight with: what is happening, why it matters, the business or product opportunity, and who can act on it.
4. Highlight both current trends and white-space opportunities.
5. Keep the report scannable, professional, and under 5 minutes to read.

Structure the HTML report into these sections:

SECTOR SCAN - "Key Market Dynamics and Strategic Patterns" (3 insights on macro themes)
SIGNAL DETECTION - "Emerging but Underexploited Trends" (2 insights on nascent trends)
TACTICAL BRIEF - "Actionable Moves for Builders and Investors" (3 insights, one each for founders, investors, operators)
OPPORTUNITY MATRIX - "Gaps, White Spaces, and Monetizable Problems" (2 market gaps with what is missing, what could fix it, the business model, and why now)

Final Output Format:
- Start the report with an <h1> title.
- Use bullet lists inside each section and highlight key terms with <strong>.
- Only output raw HTML - no markdown, no commentary, no code fences.
- Do NOT include filler text.

Data:
{cleaned}"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cleaning_prompt_embeds_dataset() {
        let articles = vec![ArticleDigest {
            title: "Acme raises".to_string(),
            content: "Body".to_string(),
            source: "techcrunch".to_string(),
        }];
        let prompt = cleaning_prompt(&articles);
        assert!(prompt.contains("\"Acme raises\""));
        assert!(prompt.contains("trend tags"));
    }

    #[test]
    fn test_composition_prompt_embeds_cleaned_data() {
        let prompt = composition_prompt("[{\"title\":\"x\"}]");
        assert!(prompt.contains("[{\"title\":\"x\"}]"));
        assert!(prompt.contains("SECTOR SCAN"));
    }
}
