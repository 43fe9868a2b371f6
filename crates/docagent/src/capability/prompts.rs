//! Prompt text for the LLM-backed capabilities and oracle.

use crate::document::ExtractionKind;

pub const JSON_ONLY_SYSTEM: &str = "Output valid JSON only.";

pub const AGENT_SYSTEM: &str = "You are an autonomous document processing agent. Output ONLY valid JSON.";

pub fn classify(text: &str) -> String {
    format!(
        "Classify the document into EXACTLY one category:\n\
         1. INVOICE\n\
         2. RESUME\n\
         3. RESEARCH_PAPER\n\
         4. LEGAL_DOC\n\
         5. OTHER\n\n\
         Text: {}\n\n\
         Respond ONLY with the category name (e.g. 'RESUME'). Do not add numbers or punctuation.",
        text
    )
}

pub fn extract(kind: ExtractionKind, text: &str) -> String {
    let instructions = match kind {
        ExtractionKind::Invoice => {
            "Extract invoice data as JSON. If a field is not found, return 0 or null.\n\
             Required fields:\n\
             - 'vendor': company name\n\
             - 'date': invoice date (YYYY-MM-DD)\n\
             - 'total_amount': grand total, if printed\n\
             - 'line_items': list of objects with 'description', 'qty', 'unit_price' and 'total' (row total)"
        }
        ExtractionKind::Resume => {
            "Score this resume from 0 to 100. Return JSON with 'score' (integer), \
             'skills' (list of strings) and 'name' (candidate name)."
        }
        ExtractionKind::ResearchPaper => {
            "Analyze this research paper. Return a JSON object with 'title' \
             and 'summary' (a concise summary of 6-7 lines)."
        }
        ExtractionKind::LegalDoc => {
            "Extract legal document data as JSON with 'document_type' (e.g. NDA, Lease, Will), \
             'parties' (list of names), 'effective_date' and 'expiration_date' (YYYY-MM-DD or null), \
             'key_clauses' (object of clause name to short description) and 'summary'."
        }
        ExtractionKind::AudioNote => {
            "This is the transcript of a voice note. Return JSON with 'summary' \
             (2-3 sentences), 'sentiment' (Positive, Neutral or Negative) and \
             'action_items' (list of strings)."
        }
        ExtractionKind::Unknown => {
            "Return JSON with 'summary' (2 sentences) and 'keywords' (list of strings)."
        }
    };
    format!("{}\n\nText: {}", instructions, text)
}

pub const VISION: &str = "Describe this image for document processing. \
     Transcribe ALL visible text verbatim first, then briefly describe any \
     non-text content. Do not add commentary.";

/// Decision prompt: the projection plus the workflow the agent should follow.
pub fn decide(projection_json: &str) -> String {
    format!(
        "Analyze the current state and decide the next action.\n\n\
         Current State: {}\n\n\
         Available Tools: [classify_document, analyze_image, extract_invoice, score_resume, \
         summarize_research_paper, extract_legal_doc, summarize_audio_note, summarize_unknown, save_data]\n\n\
         Workflows:\n\
         1. If 'save_data' is in history -> action: \"STOP\"\n\
         2. If 'type' is 'MISSING' -> action: \"classify_document\"\n\
         3. If 'type' is 'IMAGE_PENDING_OCR' -> action: \"analyze_image\"\n\
         4. If 'type' is 'INVOICE' and 'has_invoice_data' is false -> action: \"extract_invoice\"\n\
         5. If 'type' is 'RESUME' and 'has_resume_score' is false -> action: \"score_resume\"\n\
         6. If 'type' is 'RESEARCH_PAPER' and 'has_research_summary' is false -> action: \"summarize_research_paper\"\n\
         7. If 'type' is 'LEGAL_DOC' and 'has_legal_data' is false -> action: \"extract_legal_doc\"\n\
         8. If 'type' is 'AUDIO_NOTE' and 'has_audio_summary' is false -> action: \"summarize_audio_note\"\n\
         9. If 'type' is 'OTHER' and 'has_unknown_summary' is false -> action: \"summarize_unknown\"\n\
         10. If the data flag for the current type is true -> action: \"save_data\"\n\n\
         Return JSON format:\n\
         {{\n  \"reasoning\": \"Brief thought process\",\n  \"action\": \"Next Tool Name\"\n}}",
        projection_json
    )
}
