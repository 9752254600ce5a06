//! Cascade Prompts
//!
//! Prompt templates for the six-stage annotation cascade. Stages 1, 4 and 6
//! speak to the biologist persona inside one shared conversation; stages 2
//! and 5 open fresh conversations with the fact-checker persona. Claim
//! prompts are built as template plus a fixed instruction block, matching
//! how the revision prompts are assembled.

pub const BIOLOGIST_SYSTEM: &str =
    "You are an efficient and insightful assistant to a molecular biologist.";

pub const VERIFY_SYSTEM: &str =
    "You are a helpful and objective fact-checker to verify the summary of gene set.";

/// Stage 1: baseline analysis with the process name on the first line.
pub fn baseline_prompt(genes: &str) -> String {
    format!(
        "Write a critical analysis of the biological processes performed by this system of interacting proteins.\n\
         Propose a brief name for the most prominent biological process performed by the system.\n\
         Put the name at the top of the analysis as \"Process: <name>\".\n\
         Be concise, do not use unnecessary words.\n\
         Be textual, do not use any format symbols such as \"*\", \"-\" or other tokens.\n\
         Be specific, avoid overly general statements such as \"the proteins are involved in various cellular processes\".\n\
         Be factual, do not editorialize.\n\
         For each important point, describe your reasoning and supporting information.\n\
         For each biological function name, show the corresponding gene names.\n\
         Here is the gene set: {}",
        genes
    )
}

const TOPIC_CLAIMS_INSTRUCTION: &str = "\n\
    Only generate claims with affirmative sentence for the entire gene set.\n\
    The gene set should only be separated by comma, e.g., \"a,b,c\".\n\
    Don't generate claims for the single gene or incomplete gene set.\n\
    Don't generate hypothesis claims over the previous analysis.\n\
    Please replace the statement like 'these genes', 'this system' with the core genes in the given gene set.";

/// Stage 2: extract checkable claims from the proposed process name.
pub fn topic_claims_prompt(genes: &str, process: &str) -> String {
    format!(
        "Here is the original process name for the gene set {}:\n{}\n\
         However, the process name might be false. Please generate decontextualized claims for the process name that need to be verified.\n\
         Only Return a list type that contain all generated claim strings, for example, [\"claim_1\", \"claim_2\"]{}",
        genes, process, TOPIC_CLAIMS_INSTRUCTION
    )
}

const ANALYSIS_CLAIMS_INSTRUCTION: &str = "\n\
    Generate claims for genes and their biological functions around the updated process name.\n\
    Don't generate claims for the entire gene set or 'this system'.\n\
    Don't generate unworthy claims such as the summarization and reasoning over the previous analysis.\n\
    Claims must contain the gene names and their biological process functions.";

/// Stage 5: extract checkable claims from the revised analysis.
pub fn analysis_claims_prompt(summary: &str) -> String {
    format!(
        "Here is the summary of the given gene set: \n{}\n\
         However, the gene analysis in the summary might not support the updated process name.\n\
         Please generate several decontextualized claims for the analytical narratives that need to be verified.\n\
         Only Return a list type that contain all generated claim strings, for example, [\"claim_1\", \"claim_2\"]{}",
        summary, ANALYSIS_CLAIMS_INSTRUCTION
    )
}

const MODIFICATION_INSTRUCTION: &str = "\n\
    Put the updated process name at the top of the analysis as \"Process: <name>\".\n\
    Be concise, do not use unnecessary words.\n\
    Be textual, do not use any format symbols such as \"*\", \"-\" or other tokens. All modified sentence should encoded into utf-8.\n\
    Be specific, avoid overly general statements such as \"the proteins are involved in various cellular processes\".\n\
    Be factual, do not editorialize.\n\
    You must retain the gene names of each updated biological functions in the new summary.";

/// Stage 4: revise the baseline with the topic verification report.
pub fn modification_prompt(verification_topic: &str) -> String {
    format!(
        "I have finished the verification for process name. Here is the verification report:\n{}\n\
         You should only consider the successfully verified claims.\n\
         If claims are supported, you should retain the original process name and only can make a minor grammar revision.\n\
         If claims are partially supported, you should discard the unsupported part.\n\
         If claims are refuted, you must replace the original process name with the most significant (i.e., top-1) biological function term summarized from the verification report.\n\
         Meanwhile, revise the original summaries using the verified (or updated) process name. Do not use sentence like \"There are no direct evidence to...\"{}",
        verification_topic, MODIFICATION_INSTRUCTION
    )
}

const SUMMARIZATION_INSTRUCTION: &str = "\n\
    If the analytical narratives of genes can't directly support or related to the updated process name, you must propose a new brief biological process name from the analytical texts.\n\
    Otherwise, you must retain the updated process name and only can make a grammar revision.\n\
    IF the claim is supported, you must complement the narratives by using the standard evidence of gene set functions (or gene summaries) in the verification report but don't change the updated process name.\n\
    IF the claim is not supported, do not mention any statement like \"... was not directly confirmed by...\"\n\
    Be concise, do not use unnecessary format like **, only return the concise texts.";

/// Stage 6: final revision with the analysis verification report.
pub fn summarization_prompt(verification_analysis: &str) -> String {
    format!(
        "I have finished the verification for the revised summary. Here is the verification report:\n{}\n\
         Please modify the summary according to the verification report again.{}",
        verification_analysis, SUMMARIZATION_INSTRUCTION
    )
}
