use analysis_domain::GenerationRequest;

pub const SYSTEM_PERSONA: &str = "You are an educational content creator who writes \
comprehensive, well-structured paragraphs from video transcripts and weaves visual \
references naturally into the text.";

pub fn build_user_prompt(request: &GenerationRequest) -> String {
    let count = request.target_marker_count;
    format!(
        "Based on the following video transcript from \"{title}\", write one educational \
paragraph that:\n\
\n\
1. Summarizes the key concepts and information\n\
2. Keeps an academic tone and structure\n\
3. Includes exactly {count} reference numbers [1], [2], [3], etc. woven into the text\n\
4. Ties each reference to a visual element or concept that benefits from an image\n\
5. Keeps the references natural rather than forced\n\
6. Stays between 200 and 400 words\n\
7. Focuses on the most important material\n\
\n\
Transcript:\n\
{transcript}\n",
        title = request.title,
        transcript = request.transcript,
    )
}
