// Prompt templates for resume analysis. Replace `{text}` before sending.

pub const RESUME_ANALYSIS_PROMPT: &str = r#"Extract structured data from the following resume text.

Return a JSON object with these fields:
1. "name": candidate name
2. "email": candidate email
3. "skills": list of technical and soft skills (strings)
4. "experience": list of objects with "title", "company", "years" (number, approx), "description"
5. "education": list of objects with "degree", "school", "year"
6. "summary": a brief professional summary (2-3 sentences)
7. "years_of_experience": total years of experience (number)

RESUME TEXT:
{text}"#;

pub const SEARCH_CRITERIA_PROMPT: &str = r#"You are a job search assistant. Analyze the resume text below and extract:
1. "experience_level": one of "Intern", "Junior", "Mid-Level", "Senior", "Lead" (based on years of experience).
2. "domain": the primary role domain (e.g. "Frontend Developer", "Data Scientist", "DevOps Engineer").
3. "degree": highest degree (e.g. "Bachelors", "Masters", "PhD") or null.
4. "top_skills": list of the 3-5 most critical technical skills for their role.
5. "query": a precise job search query for this candidate,
   e.g. "Junior React Developer jobs in India" or "Senior Data Scientist remote jobs".

RESUME TEXT:
{text}"#;
