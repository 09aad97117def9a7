//! Static reference tables for the synthetic doctor corpus.
//!
//! The generator draws from these tables, and the HTTP façade serves the
//! location / specialty enumerations and example queries from them, so the
//! dropdowns in the frontend always agree with the data that was ingested.

use serde::Serialize;

/// Primary specialty → sub-specialties.
pub const SPECIALTIES: &[(&str, &[&str])] = &[
    (
        "Cardiology",
        &[
            "Interventional Cardiology",
            "Electrophysiology",
            "Pediatric Cardiology",
            "Heart Failure and Transplantation",
            "Preventive Cardiology",
            "Nuclear Cardiology",
        ],
    ),
    (
        "Neurosurgery",
        &[
            "Spine Surgery",
            "Pediatric Neurosurgery",
            "Neuro-oncology",
            "Vascular Neurosurgery",
            "Functional Neurosurgery",
            "Skull Base Surgery",
        ],
    ),
    (
        "Oncology",
        &[
            "Medical Oncology",
            "Surgical Oncology",
            "Radiation Oncology",
            "Pediatric Oncology",
            "Gynecologic Oncology",
            "Hematologic Oncology",
        ],
    ),
    (
        "Orthopedic Surgery",
        &[
            "Sports Medicine",
            "Joint Replacement",
            "Spine Surgery",
            "Pediatric Orthopedics",
            "Hand Surgery",
            "Trauma Surgery",
        ],
    ),
    (
        "Pediatrics",
        &[
            "Neonatology",
            "Pediatric Emergency Medicine",
            "Pediatric Gastroenterology",
            "Pediatric Pulmonology",
            "Developmental Pediatrics",
            "Pediatric Endocrinology",
        ],
    ),
    (
        "Gastroenterology",
        &[
            "Hepatology",
            "Inflammatory Bowel Disease",
            "Therapeutic Endoscopy",
            "Pancreatic Diseases",
            "Motility Disorders",
            "Transplant Hepatology",
        ],
    ),
    (
        "Urology",
        &[
            "Urologic Oncology",
            "Pediatric Urology",
            "Male Infertility",
            "Female Urology",
            "Kidney Stone Disease",
            "Robotic Surgery",
        ],
    ),
    (
        "Dermatology",
        &[
            "Cosmetic Dermatology",
            "Mohs Surgery",
            "Pediatric Dermatology",
            "Immunodermatology",
            "Dermatopathology",
            "Laser Surgery",
        ],
    ),
    (
        "Neurology",
        &[
            "Stroke and Cerebrovascular Disease",
            "Epilepsy",
            "Movement Disorders",
            "Multiple Sclerosis",
            "Headache Medicine",
            "Neuromuscular Disease",
        ],
    ),
    (
        "Obstetrics and Gynecology",
        &[
            "Maternal-Fetal Medicine",
            "Reproductive Endocrinology",
            "Gynecologic Oncology",
            "Urogynecology",
            "Minimally Invasive Surgery",
            "Adolescent Gynecology",
        ],
    ),
];

/// Location → affiliated hospitals.
pub const HOSPITALS_BY_LOCATION: &[(&str, &[&str])] = &[
    (
        "New York, NY",
        &[
            "Mount Sinai Hospital",
            "NYU Langone Health",
            "Columbia University Medical Center",
            "Memorial Sloan Kettering Cancer Center",
            "Hospital for Special Surgery",
            "Weill Cornell Medical Center",
        ],
    ),
    (
        "Los Angeles, CA",
        &[
            "Cedars-Sinai Medical Center",
            "UCLA Medical Center",
            "Keck Hospital of USC",
            "Children's Hospital Los Angeles",
            "City of Hope National Medical Center",
        ],
    ),
    (
        "Chicago, IL",
        &[
            "Northwestern Memorial Hospital",
            "Rush University Medical Center",
            "University of Chicago Medical Center",
            "Loyola University Medical Center",
            "Advocate Christ Medical Center",
        ],
    ),
    (
        "Houston, TX",
        &[
            "MD Anderson Cancer Center",
            "Houston Methodist Hospital",
            "Texas Children's Hospital",
            "Memorial Hermann-Texas Medical Center",
            "Baylor St. Luke's Medical Center",
        ],
    ),
    (
        "Boston, MA",
        &[
            "Massachusetts General Hospital",
            "Brigham and Women's Hospital",
            "Boston Children's Hospital",
            "Dana-Farber Cancer Institute",
            "Beth Israel Deaconess Medical Center",
        ],
    ),
    (
        "Philadelphia, PA",
        &[
            "Hospital of the University of Pennsylvania",
            "Children's Hospital of Philadelphia",
            "Thomas Jefferson University Hospital",
            "Temple University Hospital",
            "Penn Presbyterian Medical Center",
        ],
    ),
    (
        "Seattle, WA",
        &[
            "University of Washington Medical Center",
            "Seattle Children's Hospital",
            "Virginia Mason Medical Center",
            "Swedish Medical Center",
            "Harborview Medical Center",
        ],
    ),
    (
        "San Francisco, CA",
        &[
            "UCSF Medical Center",
            "Stanford Health Care",
            "California Pacific Medical Center",
            "Zuckerberg San Francisco General Hospital",
            "Kaiser Permanente San Francisco",
        ],
    ),
    (
        "Atlanta, GA",
        &[
            "Emory University Hospital",
            "Children's Healthcare of Atlanta",
            "Grady Memorial Hospital",
            "Piedmont Atlanta Hospital",
            "Northside Hospital",
        ],
    ),
    (
        "Miami, FL",
        &[
            "Jackson Memorial Hospital",
            "University of Miami Hospital",
            "Baptist Hospital of Miami",
            "Mount Sinai Medical Center Miami",
            "Nicklaus Children's Hospital",
        ],
    ),
];

pub const LANGUAGE_SETS: &[&[&str]] = &[
    &["English"],
    &["English", "Spanish"],
    &["English", "Mandarin"],
    &["English", "Hindi"],
    &["English", "Arabic"],
    &["English", "French"],
    &["English", "Korean"],
    &["English", "Russian"],
    &["English", "Portuguese"],
    &["English", "Japanese"],
    &["English", "Spanish", "Portuguese"],
    &["English", "Hindi", "Punjabi"],
    &["English", "Mandarin", "Cantonese"],
];

/// Surgical track-record fragments; rendered as "Dr. {last} has {fragment}. ..."
pub const SURGERY_SUMMARIES: &[(&str, &[&str])] = &[
    (
        "Cardiology",
        &[
            "performed over 500 successful coronary artery bypass grafting (CABG) procedures with a 98% success rate, specializing in minimally invasive techniques",
            "completed 300+ transcatheter aortic valve replacements (TAVR) with exceptional outcomes in high-risk patients",
            "pioneered robotic-assisted mitral valve repair techniques with over 200 successful procedures",
            "led complex heart transplant surgeries with post-operative survival rates exceeding national averages",
            "performed 400+ percutaneous coronary interventions including complex bifurcation stenting",
            "specialized in pediatric congenital heart defect repairs with over 150 successful operations",
        ],
    ),
    (
        "Neurosurgery",
        &[
            "completed 600+ brain tumor resections using advanced neuronavigation and awake craniotomy techniques",
            "performed over 400 complex spine surgeries including minimally invasive lumbar fusions",
            "specialized in deep brain stimulation procedures for Parkinson's disease with 200+ successful implants",
            "pioneered endovascular treatment of cerebral aneurysms with over 300 procedures",
            "led pediatric neurosurgery team in 150+ cases of spina bifida and hydrocephalus corrections",
            "performed 250+ microvascular decompressions for trigeminal neuralgia with excellent outcomes",
        ],
    ),
    (
        "Oncology",
        &[
            "managed treatment protocols for over 1000 cancer patients with personalized chemotherapy regimens",
            "performed 300+ tumor resections with margin-negative results in 95% of cases",
            "led clinical trials for novel immunotherapy treatments with 40% response rates in advanced cancers",
            "specialized in stereotactic radiosurgery with 500+ treatments for brain and spine metastases",
            "performed 200+ complex hepatobiliary cancer surgeries including Whipple procedures",
            "pioneered combination therapy protocols achieving 80% remission rates in pediatric leukemia",
        ],
    ),
    (
        "Orthopedic Surgery",
        &[
            "performed over 800 total joint replacements including complex revision surgeries",
            "specialized in arthroscopic sports medicine procedures with 500+ ACL reconstructions",
            "completed 300+ complex spine surgeries including scoliosis corrections in pediatric patients",
            "pioneered minimally invasive hip replacement techniques with 400+ successful procedures",
            "performed 200+ complex trauma reconstructions including pelvic and acetabular fractures",
            "led hand surgery program with 600+ procedures including microsurgical nerve repairs",
        ],
    ),
    (
        "Pediatrics",
        &[
            "managed care for over 5000 pediatric patients including 200+ complex chronic disease cases",
            "specialized in neonatal intensive care with successful management of 300+ premature infants",
            "led pediatric emergency department handling 10,000+ annual visits with excellent outcomes",
            "performed 150+ pediatric bronchoscopies and advanced pulmonary procedures",
            "managed 400+ cases of pediatric diabetes with innovative continuous glucose monitoring protocols",
            "specialized in developmental disorders diagnosing and treating 500+ autism spectrum cases",
        ],
    ),
    (
        "Gastroenterology",
        &[
            "performed over 5000 colonoscopies with adenoma detection rate of 45%, well above national average",
            "completed 300+ ERCP procedures for complex biliary and pancreatic disorders",
            "specialized in liver transplant evaluation and post-transplant care for 200+ patients",
            "pioneered endoscopic submucosal dissection techniques with 150+ successful procedures",
            "managed 500+ inflammatory bowel disease patients with biologic therapy protocols",
            "performed 400+ therapeutic endoscopies including variceal banding and stricture dilations",
        ],
    ),
    (
        "Urology",
        &[
            "performed over 500 robotic-assisted prostatectomies with excellent continence outcomes",
            "completed 300+ kidney stone procedures including complex percutaneous nephrolithotomy",
            "specialized in pediatric urology with 200+ hypospadias repairs and reconstructive surgeries",
            "performed 400+ transurethral resections for bladder cancer with low recurrence rates",
            "led male infertility program with 150+ successful microsurgical varicocelectomies",
            "pioneered laser enucleation techniques for benign prostatic hyperplasia with 300+ procedures",
        ],
    ),
    (
        "Dermatology",
        &[
            "performed over 2000 Mohs micrographic surgeries with 99% cure rate for skin cancers",
            "completed 500+ complex reconstructions following skin cancer removal",
            "specialized in pediatric dermatology managing 300+ cases of severe atopic dermatitis",
            "performed 1000+ cosmetic procedures including laser resurfacing and injectable treatments",
            "led phototherapy program treating 400+ patients with psoriasis and vitiligo",
            "pioneered combination therapy approaches for 200+ melanoma patients",
        ],
    ),
    (
        "Neurology",
        &[
            "managed over 1000 stroke patients with rapid thrombolysis protocols improving outcomes by 40%",
            "specialized in epilepsy management with 300+ patients achieving seizure freedom",
            "led movement disorders clinic treating 500+ Parkinson's disease patients with DBS referrals",
            "performed 200+ botulinum toxin injections for dystonia and spasticity management",
            "managed 400+ multiple sclerosis patients with disease-modifying therapy protocols",
            "specialized in neuromuscular diseases diagnosing and treating 300+ rare disorder cases",
        ],
    ),
    (
        "Obstetrics and Gynecology",
        &[
            "delivered over 2000 babies including 300+ high-risk pregnancies with excellent outcomes",
            "performed 500+ minimally invasive hysterectomies with reduced recovery times",
            "specialized in reproductive endocrinology achieving 40% IVF success rates",
            "completed 200+ complex gynecologic oncology surgeries including radical hysterectomies",
            "performed 400+ urogynecologic procedures for pelvic floor disorders",
            "led maternal-fetal medicine unit managing 300+ cases of pregnancy complications",
        ],
    ),
];

pub const EXPERTISE_STATEMENTS: &[(&str, &[&str])] = &[
    (
        "Cardiology",
        &[
            "Research focus on novel biomarkers for early detection of heart failure in diabetic patients. Published 15 peer-reviewed papers on cardiovascular risk stratification.",
            "Expertise in complex coronary interventions including chronic total occlusions. Proctor for new interventional cardiologists in advanced techniques.",
            "Special interest in preventive cardiology and lifestyle medicine. Developed comprehensive cardiac rehabilitation programs improving patient outcomes by 35%.",
            "Leading researcher in cardiac imaging techniques including 3D echocardiography and cardiac MRI. Established advanced imaging protocols adopted nationally.",
            "Focused on women's cardiovascular health and gender-specific risk factors. Founded specialized women's heart health clinic serving 500+ patients annually.",
            "Pioneer in telemedicine for cardiac monitoring. Implemented remote patient monitoring reducing readmissions by 40% in heart failure patients.",
        ],
    ),
    (
        "Neurosurgery",
        &[
            "Research interest in brain-computer interfaces for paralyzed patients. Leading clinical trials for implantable neural devices with promising results.",
            "Expertise in minimally invasive spine surgery techniques. Developed novel approaches reducing surgical time by 30% and improving patient recovery.",
            "Special focus on pediatric brain tumors and epilepsy surgery. Established comprehensive pediatric neurosurgery program with multidisciplinary approach.",
            "Leading researcher in neurovascular surgery and cerebral bypass techniques. Published definitive textbook on microsurgical anatomy.",
            "Pioneer in awake craniotomy for eloquent area tumors. Achieved gross total resection in 85% of cases while preserving neurological function.",
            "Focused on traumatic brain injury outcomes. Developed protocols improving severe TBI survival rates by 25% through aggressive management.",
        ],
    ),
    (
        "Oncology",
        &[
            "Research focus on precision medicine and targeted therapy selection. Leading investigator in multiple phase II and III clinical trials.",
            "Expertise in CAR-T cell therapy for hematologic malignancies. Achieved complete remission in 60% of refractory lymphoma cases.",
            "Special interest in cancer survivorship and quality of life. Established comprehensive survivorship clinic addressing long-term treatment effects.",
            "Pioneer in combination immunotherapy approaches. Published groundbreaking research on checkpoint inhibitor combinations improving response rates.",
            "Focused on geriatric oncology and treatment optimization for elderly patients. Developed frailty assessment tools adopted internationally.",
            "Leading researcher in liquid biopsies for early cancer detection. Principal investigator for multi-center screening trials.",
        ],
    ),
    (
        "Orthopedic Surgery",
        &[
            "Research interest in biological approaches to cartilage regeneration. Leading clinical trials for stem cell therapies in osteoarthritis.",
            "Expertise in computer-assisted navigation for joint replacement. Achieved alignment within 2 degrees in 98% of knee replacements.",
            "Special focus on athlete care and return to sport protocols. Team physician for professional sports teams with excellent return-to-play outcomes.",
            "Pioneer in outpatient joint replacement surgery. Developed rapid recovery protocols allowing 90% same-day discharge for hip replacements.",
            "Focused on pediatric deformity correction including limb lengthening. Achieved excellent outcomes in 95% of complex reconstructions.",
            "Leading researcher in orthopedic biomechanics and implant design. Holds 5 patents for innovative surgical devices.",
        ],
    ),
    (
        "Pediatrics",
        &[
            "Research focus on early intervention for autism spectrum disorders. Developed screening protocols identifying ASD 6 months earlier than standard.",
            "Expertise in pediatric obesity prevention and management. Led community programs reducing childhood obesity rates by 20% in target populations.",
            "Special interest in rare genetic disorders and metabolic diseases. Established specialized clinic diagnosing 50+ rare conditions annually.",
            "Pioneer in pediatric palliative care integration. Developed protocols improving quality of life for children with life-limiting conditions.",
            "Focused on adolescent mental health and suicide prevention. Implemented screening programs identifying at-risk youth with 85% accuracy.",
            "Leading researcher in pediatric infectious diseases and vaccine development. Principal investigator for novel vaccine trials.",
        ],
    ),
    (
        "Gastroenterology",
        &[
            "Research interest in gut microbiome and its role in inflammatory bowel disease. Published seminal papers on microbiome-based therapies.",
            "Expertise in advanced endoscopic techniques including peroral endoscopic myotomy. Performed procedures avoiding surgery in 95% of achalasia cases.",
            "Special focus on fatty liver disease and metabolic syndrome. Developed integrated care model reducing disease progression by 40%.",
            "Pioneer in artificial intelligence for polyp detection. Implemented AI-assisted colonoscopy improving adenoma detection rates by 25%.",
            "Focused on celiac disease and gluten-related disorders. Established comprehensive center diagnosing 200+ cases annually.",
            "Leading researcher in pancreatic cancer early detection. Developing novel biomarker panels with 90% sensitivity for early-stage disease.",
        ],
    ),
    (
        "Urology",
        &[
            "Research focus on immunotherapy for bladder cancer. Leading investigator for novel checkpoint inhibitor combinations showing promising results.",
            "Expertise in nerve-sparing techniques for prostate surgery. Achieved potency preservation in 85% of bilateral nerve-sparing procedures.",
            "Special interest in female pelvic medicine and reconstruction. Developed minimally invasive techniques for complex pelvic organ prolapse.",
            "Pioneer in focal therapy for prostate cancer. Implemented MRI-guided targeted treatments preserving quality of life in selected patients.",
            "Focused on pediatric urology and hypospadias outcomes. Achieved single-stage repair success in 95% of cases.",
            "Leading researcher in kidney stone prevention. Developed metabolic evaluation protocols reducing stone recurrence by 50%.",
        ],
    ),
    (
        "Dermatology",
        &[
            "Research interest in melanoma immunotherapy resistance mechanisms. Leading clinical trials for combination treatments overcoming resistance.",
            "Expertise in complex wound healing and reconstruction. Developed protocols improving healing rates by 40% in chronic wounds.",
            "Special focus on pediatric vascular anomalies. Established multidisciplinary clinic treating 300+ complex cases annually.",
            "Pioneer in teledermatology and AI-assisted diagnosis. Implemented systems achieving 95% diagnostic accuracy for common conditions.",
            "Focused on ethnic skin and culturally sensitive dermatology. Published definitive guide on skin conditions in diverse populations.",
            "Leading researcher in psoriasis pathogenesis and treatment. Principal investigator for novel biologic therapies achieving PASI 90 in 70% of patients.",
        ],
    ),
    (
        "Neurology",
        &[
            "Research focus on Alzheimer's disease biomarkers and early intervention. Leading investigator for disease-modifying therapy trials.",
            "Expertise in refractory epilepsy and surgical evaluation. Achieved seizure freedom in 70% of carefully selected surgical candidates.",
            "Special interest in autoimmune neurological disorders. Developed rapid diagnosis protocols reducing treatment delays by 50%.",
            "Pioneer in teleneurology for stroke care. Implemented hub-and-spoke model improving rural stroke outcomes significantly.",
            "Focused on neuromuscular disease genetic testing and counseling. Diagnosed 100+ rare genetic conditions using advanced sequencing.",
            "Leading researcher in migraine pathophysiology. Developed novel preventive strategies reducing migraine days by 60% in chronic sufferers.",
        ],
    ),
    (
        "Obstetrics and Gynecology",
        &[
            "Research interest in preeclampsia prediction and prevention. Developed risk stratification model identifying 85% of cases before clinical onset.",
            "Expertise in fertility preservation for cancer patients. Achieved 45% pregnancy rates following oncofertility treatments.",
            "Special focus on minimally invasive surgery for endometriosis. Performed excisions achieving 80% pain reduction at 2-year follow-up.",
            "Pioneer in non-invasive prenatal testing implementation. Led adoption achieving 99% accuracy for common chromosomal abnormalities.",
            "Focused on global maternal health and reducing mortality. Implemented protocols in resource-limited settings saving 200+ lives annually.",
            "Leading researcher in uterine transplantation. Part of team achieving first successful pregnancies following transplant procedures.",
        ],
    ),
];

pub const FIRST_NAMES: &[&str] = &[
    "James", "Mary", "Robert", "Patricia", "John", "Jennifer", "Michael", "Linda", "David",
    "Elizabeth", "William", "Barbara", "Richard", "Susan", "Joseph", "Jessica", "Thomas",
    "Sarah", "Charles", "Karen", "Daniel", "Nancy", "Matthew", "Lisa", "Anthony", "Betty",
    "Mark", "Sandra", "Steven", "Ashley", "Andrew", "Emily", "Kevin", "Michelle", "Brian",
    "Amanda", "Priya", "Wei", "Omar", "Sofia", "Hiroshi", "Fatima", "Carlos", "Mei",
    "Rahul", "Elena", "Ahmed", "Yuna", "Diego", "Aisha",
];

pub const LAST_NAMES: &[&str] = &[
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis",
    "Rodriguez", "Martinez", "Hernandez", "Lopez", "Gonzalez", "Wilson", "Anderson", "Thomas",
    "Taylor", "Moore", "Jackson", "Martin", "Lee", "Perez", "Thompson", "White", "Harris",
    "Sanchez", "Clark", "Ramirez", "Lewis", "Robinson", "Walker", "Young", "Allen", "King",
    "Wright", "Scott", "Nguyen", "Patel", "Chen", "Kim", "Singh", "Khan", "Tanaka", "Silva",
    "Cohen", "Rossi", "Murphy", "Okafor", "Ivanova", "Haddad",
];

/// A canned patient query served by `GET /examples`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ExampleQuery {
    pub query: &'static str,
    pub location: Option<&'static str>,
    pub description: &'static str,
}

pub const EXAMPLE_QUERIES: &[ExampleQuery] = &[
    ExampleQuery {
        query: "I've been having severe chest pain and shortness of breath",
        location: Some("New York, NY"),
        description: "Cardiac symptoms",
    },
    ExampleQuery {
        query: "My child has recurring ear infections and hearing problems",
        location: Some("Boston, MA"),
        description: "Pediatric ENT issue",
    },
    ExampleQuery {
        query: "I need help with chronic back pain that radiates down my leg",
        location: None,
        description: "Neurological/Orthopedic issue",
    },
    ExampleQuery {
        query: "Looking for a dermatologist for severe acne treatment",
        location: Some("Los Angeles, CA"),
        description: "Dermatological issue",
    },
    ExampleQuery {
        query: "Need oncologist for breast cancer second opinion",
        location: Some("Houston, TX"),
        description: "Oncology consultation",
    },
];

pub fn specialties() -> Vec<&'static str> {
    SPECIALTIES.iter().map(|(name, _)| *name).collect()
}

pub fn locations() -> Vec<&'static str> {
    HOSPITALS_BY_LOCATION.iter().map(|(name, _)| *name).collect()
}

pub fn sub_specialties(specialty: &str) -> Option<&'static [&'static str]> {
    lookup(SPECIALTIES, specialty)
}

pub fn hospitals(location: &str) -> Option<&'static [&'static str]> {
    lookup(HOSPITALS_BY_LOCATION, location)
}

pub fn surgery_summaries(specialty: &str) -> Option<&'static [&'static str]> {
    lookup(SURGERY_SUMMARIES, specialty)
}

pub fn expertise_statements(specialty: &str) -> Option<&'static [&'static str]> {
    lookup(EXPERTISE_STATEMENTS, specialty)
}

fn lookup(
    table: &'static [(&'static str, &'static [&'static str])],
    key: &str,
) -> Option<&'static [&'static str]> {
    table
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, values)| *values)
}
