//! Instruction prompts sent to the generation model.

/// Summary-only prompt. The memo content follows the instruction.
pub fn summary_prompt(content: &str) -> String {
    format!(
        "다음 메모를 간결하고 명확하게 요약해주세요. 핵심 내용만 2-3문장으로 정리해주세요. 반드시 존댓말로 작성해주세요:\n\n{}",
        content
    )
}

/// Combined prompt asking for a JSON object with `summary` and `tags`.
pub fn summary_and_tags_prompt(content: &str) -> String {
    format!(
        r#"다음 메모를 분석하여 다음 두 가지를 제공해주세요:
1. 메모를 간결하고 명확하게 요약 (핵심 내용만 2-3문장, 존댓말)
2. 메모의 주요 주제와 내용을 반영한 태그 3-5개 (한국어, 쉼표로 구분)

응답 형식은 반드시 다음 JSON 형식으로 작성해주세요:
{{
  "summary": "요약 내용",
  "tags": ["태그1", "태그2", "태그3"]
}}

메모 내용:
{}"#,
        content
    )
}
