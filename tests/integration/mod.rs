//! Integration tests driving the pipelines against a scripted provider.

mod cascade_flow;
mod stub;
mod topic_and_cot;
mod verifier_loop;
